//! Build options shared by every variant of one invocation.

use serde::{Deserialize, Serialize};

/// Default GROMACS release to build.
pub const DEFAULT_GROMACS_VERSION: &str = "2020.1";

/// Options that are constant across all variants built together.
///
/// Only `mpi` and `double` affect naming; the remaining fields shape the
/// rendered CMake options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
    /// Build with MPI (distributed execution)
    pub mpi: bool,
    /// Build in double precision
    pub double: bool,
    /// Enable CUDA GPU support
    pub cuda: bool,
    /// Download and run the regression test suite
    pub regtest: bool,
    /// Link against an externally built FFTW instead of building one
    pub external_fftw: bool,
    /// GROMACS release, e.g. `2020.1`
    pub gromacs_version: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            mpi: false,
            double: false,
            cuda: false,
            regtest: false,
            external_fftw: false,
            gromacs_version: DEFAULT_GROMACS_VERSION.to_string(),
        }
    }
}

impl BuildOptions {
    /// Enable or disable MPI.
    pub fn with_mpi(mut self, mpi: bool) -> Self {
        self.mpi = mpi;
        self
    }

    /// Enable or disable double precision.
    pub fn with_double(mut self, double: bool) -> Self {
        self.double = double;
        self
    }

    /// Set the GROMACS release.
    pub fn with_gromacs_version(mut self, version: impl Into<String>) -> Self {
        self.gromacs_version = version.into();
        self
    }

    /// Source directory name of the unpacked release (`gromacs-2020.1`).
    pub fn source_dir_name(&self) -> String {
        format!("gromacs-{}", self.gromacs_version)
    }
}
