//! Naming suffixes for binaries, libraries and the wrapper.

use serde::{Deserialize, Serialize};

use crate::core::catalog::{DOUBLE_SUFFIX, MPI_SUFFIX, PROGRAM_NAME, RDTSCP_SUFFIX};
use crate::core::options::BuildOptions;

/// The three derived naming strings of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuffixSet {
    /// Appended to program names (`GMX_BINARY_SUFFIX`)
    pub binary: String,
    /// Appended to library names (`GMX_LIBS_SUFFIX`)
    pub library: String,
    /// Appended to the wrapper script name
    pub wrapper: String,
}

impl SuffixSet {
    /// Resolve the suffixes for a set of build options.
    ///
    /// Tokens are concatenated as `{mpi}{double}{rdtscp}`. The wrapper omits
    /// the RDTSCP token: the timing variant is chosen on the host at run time.
    pub fn resolve(options: &BuildOptions, rdtscp: bool) -> SuffixSet {
        let wrapper = wrapper_suffix(options);
        let binary = format!("{}{}", wrapper, token(rdtscp, RDTSCP_SUFFIX));

        SuffixSet {
            library: binary.clone(),
            binary,
            wrapper,
        }
    }

    /// File name of a program built with these suffixes (`gmx_mpi_d`).
    pub fn program_name(&self, base: &str) -> String {
        format!("{}{}", base, self.binary)
    }
}

/// Suffix of the wrapper: `{mpi}{double}`.
pub fn wrapper_suffix(options: &BuildOptions) -> String {
    format!(
        "{}{}",
        token(options.mpi, MPI_SUFFIX),
        token(options.double, DOUBLE_SUFFIX)
    )
}

/// Name of the wrapper users invoke (`gmx_mpi`).
pub fn wrapper_name(options: &BuildOptions) -> String {
    format!("{}{}", PROGRAM_NAME, wrapper_suffix(options))
}

fn token(enabled: bool, token: &'static str) -> &'static str {
    if enabled { token } else { "" }
}
