//! Runtime selection of the best installed variant.
//!
//! Every catalog tier the host supports is tried, most specialized first,
//! rather than only the host's best tier: an installation may lack the
//! best tier's build while still offering a narrower one.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::catalog::{SimdTier, INSTALL_ROOT, RDTSCP_SUFFIX};
use crate::host::{probe, FlagSource, HostCapabilities, ProbeError};
use crate::util::diagnostic::{suggestions, Diagnostic};
use crate::util::fs::{dir_contains, is_executable_by_all};

/// Exit code used when no installed build fits the host.
pub const NOT_FOUND_EXIT_CODE: i32 = 255;

/// The installed binary chosen for a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Tier of the chosen build
    pub tier: SimdTier,
    /// Directory holding the binary
    pub bin_dir: PathBuf,
    /// Program name after host-specific suffixes were applied
    pub program: String,
}

impl Selection {
    /// Full path of the selected binary.
    pub fn binary_path(&self) -> PathBuf {
        self.bin_dir.join(&self.program)
    }
}

/// Selection failed.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no appropriate GROMACS installation available for `{program}`")]
    NotFound {
        program: String,
        install_root: PathBuf,
        tried: Vec<PathBuf>,
    },

    #[error("invoked name `{invoked}` is not a valid program name")]
    InvalidProgramName { invoked: String },

    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl SelectError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SelectError::NotFound {
                install_root,
                tried,
                ..
            } => {
                let mut diag = Diagnostic::error(self.to_string())
                    .with_location(install_root.clone());
                if tried.is_empty() {
                    diag = diag.with_context("no installed tier is supported by this host");
                }
                for dir in tried {
                    diag = diag.with_context(format!("looked in {}", dir.display()));
                }
                diag.with_suggestion("Rebuild the image with an engine this CPU supports")
                    .with_suggestion(suggestions::PROBE_HOST)
            }
            SelectError::InvalidProgramName { .. } => Diagnostic::error(self.to_string())
                .with_context("program names must be valid UTF-8 file names")
                .with_suggestion("Invoke the wrapper through a link named after the program"),
            SelectError::Probe(err) => err.to_diagnostic(),
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            SelectError::NotFound { .. } => NOT_FOUND_EXIT_CODE,
            SelectError::InvalidProgramName { .. } | SelectError::Probe(_) => 1,
        }
    }
}

/// Searches an installation root for the best build of a program.
#[derive(Debug, Clone)]
pub struct Selector {
    install_root: PathBuf,
}

impl Selector {
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Selector {
            install_root: install_root.into(),
        }
    }

    pub fn install_root(&self) -> &Path {
        &self.install_root
    }

    /// Find the most specialized installed, executable build of `program`
    /// the host can run.
    ///
    /// When the host has RDTSCP, only the RDTSCP-enabled build is eligible.
    pub fn select(&self, program: &str, host: &HostCapabilities) -> Result<Selection, SelectError> {
        let program = if host.rdtscp {
            format!("{}{}", program, RDTSCP_SUFFIX)
        } else {
            program.to_string()
        };

        let mut tried = Vec::new();

        for tier in SimdTier::all() {
            if !host.supports(tier) {
                tracing::debug!("skipping {}: not supported by this host", tier);
                continue;
            }

            let bin_dir = self.install_root.join(tier.bin_dir_name());
            tried.push(bin_dir.clone());

            if !bin_dir.is_dir() {
                tracing::debug!("skipping {}: {} does not exist", tier, bin_dir.display());
                continue;
            }

            if !dir_contains(&bin_dir, &program) {
                tracing::debug!("skipping {}: no `{}` in {}", tier, program, bin_dir.display());
                continue;
            }

            if !is_executable_by_all(&bin_dir.join(&program)) {
                tracing::debug!("skipping {}: `{}` is not executable", tier, program);
                continue;
            }

            tracing::debug!("selected {} build in {}", tier, bin_dir.display());
            return Ok(Selection {
                tier,
                bin_dir,
                program,
            });
        }

        Err(SelectError::NotFound {
            program,
            install_root: self.install_root.clone(),
            tried,
        })
    }
}

impl Default for Selector {
    fn default() -> Self {
        Selector::new(INSTALL_ROOT)
    }
}

/// Probe the host through `source`, then select a build of `program`.
pub fn select_program(
    source: &dyn FlagSource,
    program: &str,
    install_root: &Path,
) -> Result<Selection, SelectError> {
    let host = probe(source)?;
    Selector::new(install_root).select(program, &host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticFlags;
    use crate::test_support::InstallTree;

    fn host(flags: &str) -> HostCapabilities {
        HostCapabilities::from_flags(flags).unwrap()
    }

    #[test]
    fn test_selects_most_specialized_available() {
        let tree = InstallTree::new()
            .executable(SimdTier::Avx2, "gmx")
            .executable(SimdTier::Sse2, "gmx");

        let selection = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2"))
            .unwrap();

        assert_eq!(selection.tier, SimdTier::Avx2);
        assert_eq!(selection.bin_dir, tree.root().join("bin.AVX2_256"));
        assert_eq!(selection.binary_path(), tree.root().join("bin.AVX2_256/gmx"));
    }

    #[test]
    fn test_falls_back_when_best_tier_missing() {
        let tree = InstallTree::new().executable(SimdTier::Avx2, "gmx_rdtscp");

        let selection = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2 avx512f rdtscp"))
            .unwrap();

        assert_eq!(selection.tier, SimdTier::Avx2);
        assert_eq!(selection.program, "gmx_rdtscp");
    }

    #[test]
    fn test_widest_dir_without_program_is_skipped() {
        let tree = InstallTree::new()
            .executable(SimdTier::Avx512F, "gmx_mpi")
            .executable(SimdTier::Avx2, "gmx");

        let selection = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2 avx512f"))
            .unwrap();

        assert_eq!(selection.tier, SimdTier::Avx2);
    }

    #[test]
    fn test_empty_tier_dir_is_skipped() {
        let tree = InstallTree::new()
            .empty_dir(SimdTier::Avx2)
            .executable(SimdTier::Avx, "gmx");

        let selection = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2"))
            .unwrap();

        assert_eq!(selection.tier, SimdTier::Avx);
    }

    #[test]
    fn test_rdtscp_host_requires_rdtscp_build() {
        let tree = InstallTree::new().executable(SimdTier::Avx, "gmx");

        let err = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx rdtscp"))
            .unwrap_err();

        match err {
            SelectError::NotFound { program, .. } => assert_eq!(program, "gmx_rdtscp"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_tier_is_never_selected() {
        let tree = InstallTree::new().executable(SimdTier::Avx512F, "gmx");

        let err = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2"))
            .unwrap_err();

        assert!(matches!(err, SelectError::NotFound { .. }));
        assert_eq!(err.exit_code(), NOT_FOUND_EXIT_CODE);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_binary_is_skipped() {
        let tree = InstallTree::new()
            .file(SimdTier::Avx2, "gmx", 0o754)
            .executable(SimdTier::Sse2, "gmx");

        let selection = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx avx2"))
            .unwrap();

        assert_eq!(selection.tier, SimdTier::Sse2);
    }

    #[cfg(unix)]
    #[test]
    fn test_nothing_executable_is_not_found() {
        let tree = InstallTree::new()
            .file(SimdTier::Avx2, "gmx", 0o644)
            .file(SimdTier::Sse2, "gmx", 0o700);

        let err = Selector::new(tree.root())
            .select("gmx", &host("sse2 avx2"))
            .unwrap_err();

        match &err {
            SelectError::NotFound { tried, .. } => assert_eq!(tried.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
        let output = err.to_diagnostic().format(false);
        assert!(output.contains("no appropriate GROMACS installation available for `gmx`"));
        assert!(output.contains("bin.SSE2"));
    }

    #[test]
    fn test_select_is_idempotent() {
        let tree = InstallTree::new().executable(SimdTier::Avx, "gmx_d");
        let selector = Selector::new(tree.root());
        let host = host("sse2 avx");

        let first = selector.select("gmx_d", &host).unwrap();
        let second = selector.select("gmx_d", &host).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_select_program_propagates_probe_error() {
        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx");

        let err = select_program(&StaticFlags::new("fp asimd"), "gmx", tree.root()).unwrap_err();
        assert!(matches!(err, SelectError::Probe(ProbeError::NoMatchingTier { .. })));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_select_program_with_static_flags() {
        let tree = InstallTree::new().executable(SimdTier::Sse2, "gmx_mpi");

        let selection =
            select_program(&StaticFlags::new("sse2 avx"), "gmx_mpi", tree.root()).unwrap();
        assert_eq!(selection.tier, SimdTier::Sse2);
    }
}
