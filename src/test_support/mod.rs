//! Test fixtures for gmx-builds unit tests.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::core::catalog::SimdTier;

/// A throwaway installation root with per-tier `bin.<SUFFIX>` directories.
///
/// ```rust,ignore
/// let tree = InstallTree::new()
///     .executable(SimdTier::Avx2, "gmx")
///     .file(SimdTier::Sse2, "gmx", 0o644);
/// ```
pub struct InstallTree {
    dir: TempDir,
}

impl InstallTree {
    pub fn new() -> Self {
        InstallTree {
            dir: TempDir::new().expect("failed to create temp install root"),
        }
    }

    /// Installation root path.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Install `name` under `tier` with mode 0755.
    pub fn executable(self, tier: SimdTier, name: &str) -> Self {
        self.file(tier, name, 0o755)
    }

    /// Install `name` under `tier` with the given permission bits.
    ///
    /// Permissions are ignored on non-Unix platforms.
    pub fn file(self, tier: SimdTier, name: &str, mode: u32) -> Self {
        let bin_dir = self.root().join(tier.bin_dir_name());
        fs::create_dir_all(&bin_dir).expect("failed to create bin dir");

        let path = bin_dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").expect("failed to write binary");
        set_mode(&path, mode);

        self
    }

    /// Create an empty `bin.<SUFFIX>` directory for `tier`.
    pub fn empty_dir(self, tier: SimdTier) -> Self {
        fs::create_dir_all(self.root().join(tier.bin_dir_name()))
            .expect("failed to create bin dir");
        self
    }
}

impl Default for InstallTree {
    fn default() -> Self {
        InstallTree::new()
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).expect("failed to set permissions");
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_tree_layout() {
        let tree = InstallTree::new()
            .executable(SimdTier::Avx512F, "gmx_mpi")
            .empty_dir(SimdTier::Sse2);

        assert!(tree.root().join("bin.AVX_512/gmx_mpi").is_file());
        assert!(tree.root().join("bin.SSE2").is_dir());
    }
}
