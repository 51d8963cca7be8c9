//! Filesystem utilities.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read file: {}", path.display()))
}

/// Check whether `dir` lists an entry named exactly `name`.
///
/// Unreadable directories count as not containing anything.
pub fn dir_contains(dir: &Path, name: &str) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };

    entries
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_name() == name)
}

/// Check whether `path` is a regular file executable by user, group and
/// other.
#[cfg(unix)]
pub fn is_executable_by_all(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 == 0o111,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
pub fn is_executable_by_all(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dir_contains() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("gmx"), "").unwrap();

        assert!(dir_contains(tmp.path(), "gmx"));
        assert!(!dir_contains(tmp.path(), "gmx_mpi"));
        assert!(!dir_contains(&tmp.path().join("missing"), "gmx"));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_by_all() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("gmx");
        fs::write(&file, "#!/bin/sh\n").unwrap();

        fs::set_permissions(&file, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable_by_all(&file));

        fs::set_permissions(&file, fs::Permissions::from_mode(0o750)).unwrap();
        assert!(!is_executable_by_all(&file));

        fs::set_permissions(&file, fs::Permissions::from_mode(0o644)).unwrap();
        assert!(!is_executable_by_all(&file));

        assert!(!is_executable_by_all(tmp.path()));
        assert!(!is_executable_by_all(&tmp.path().join("missing")));
    }
}
