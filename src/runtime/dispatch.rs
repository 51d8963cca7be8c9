//! Dispatch an invocation to the selected binary.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use anyhow::Result;

use crate::host::FlagSource;
use crate::runtime::select::{select_program, SelectError, Selection};
use crate::util::process::ProcessBuilder;

/// Program name from an invocation path, with any directory stripped.
///
/// `/usr/local/bin/gmx_mpi_d` and `gmx_mpi_d` both name `gmx_mpi_d`.
/// Returns `None` when there is no file name or it is not valid UTF-8.
pub fn program_from_invocation(invoked: &OsStr) -> Option<&str> {
    Path::new(invoked).file_name().and_then(|name| name.to_str())
}

/// Resolve which binary an invocation should run.
pub fn resolve(
    source: &dyn FlagSource,
    invoked: &OsStr,
    install_root: &Path,
) -> Result<Selection, SelectError> {
    let program =
        program_from_invocation(invoked).ok_or_else(|| SelectError::InvalidProgramName {
            invoked: invoked.to_string_lossy().into_owned(),
        })?;
    tracing::debug!("dispatching `{}` under {}", program, install_root.display());
    select_program(source, program, install_root)
}

/// Build the command that runs `selection` with the caller's arguments.
pub fn command_for(selection: &Selection, args: &[OsString]) -> ProcessBuilder {
    ProcessBuilder::new(selection.binary_path()).args(args)
}

/// Hand control to the selected binary.
///
/// On Unix the current process is replaced and this only returns on
/// failure. Elsewhere the binary runs as a child and its exit code is
/// returned.
pub fn run(selection: &Selection, args: &[OsString]) -> Result<i32> {
    let cmd = command_for(selection, args);
    tracing::debug!("running {}", cmd.display_command());

    #[cfg(unix)]
    {
        Err(cmd.exec_replace())
    }

    #[cfg(not(unix))]
    {
        let status = cmd.status()?;
        Ok(status.code().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::SimdTier;
    use crate::host::StaticFlags;
    use crate::test_support::InstallTree;

    #[test]
    fn test_program_from_invocation_strips_directory() {
        let name = |s: &str| program_from_invocation(OsStr::new(s)).map(str::to_string);
        assert_eq!(name("/usr/local/bin/gmx_mpi_d").as_deref(), Some("gmx_mpi_d"));
        assert_eq!(name("./gmx").as_deref(), Some("gmx"));
        assert_eq!(name("gmx_d").as_deref(), Some("gmx_d"));
        assert_eq!(name("/"), None);
    }

    #[test]
    fn test_resolve_rejects_empty_invocation() {
        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx");

        let err = resolve(&StaticFlags::new("sse2"), OsStr::new(""), tree.root()).unwrap_err();
        assert!(matches!(err, SelectError::InvalidProgramName { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_rejects_non_utf8_name() {
        use std::os::unix::ffi::OsStrExt;

        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx");
        let invoked = OsStr::from_bytes(b"/usr/local/bin/gmx\xff");

        let err = resolve(&StaticFlags::new("sse2"), invoked, tree.root()).unwrap_err();
        match &err {
            SelectError::InvalidProgramName { invoked } => assert!(invoked.contains("gmx")),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_diagnostic().format(false).contains("valid UTF-8"));
    }

    #[test]
    fn test_resolve_uses_basename() {
        let tree = InstallTree::new().executable(SimdTier::Avx, "gmx_mpi");

        let selection = resolve(
            &StaticFlags::new("sse2 avx"),
            OsStr::new("/usr/local/bin/gmx_mpi"),
            tree.root(),
        )
        .unwrap();

        assert_eq!(selection.tier, SimdTier::Avx);
        assert_eq!(selection.program, "gmx_mpi");
    }

    #[test]
    fn test_command_for_passes_arguments() {
        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx");
        let selection =
            resolve(&StaticFlags::new("sse2"), OsStr::new("gmx"), tree.root()).unwrap();

        let args = vec![OsString::from("mdrun"), OsString::from("-v")];
        let cmd = command_for(&selection, &args);

        assert_eq!(cmd.get_program(), tree.root().join("bin.SSE2/gmx").as_path());
        assert_eq!(cmd.get_args(), ["mdrun", "-v"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_for_keeps_raw_arguments() {
        use std::os::unix::ffi::OsStringExt;

        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx");
        let selection =
            resolve(&StaticFlags::new("sse2"), OsStr::new("gmx"), tree.root()).unwrap();

        let raw = OsString::from_vec(b"conf\xe9.gro".to_vec());
        let cmd = command_for(&selection, &[OsString::from("-c"), raw.clone()]);

        assert_eq!(cmd.get_args()[1], raw);
    }
}
