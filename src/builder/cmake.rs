//! CMake cache options for one GROMACS variant.
//!
//! Every option is a typed field; `to_args` renders them as the `-D`
//! arguments handed to the configure step of the recipe.

use serde::{Deserialize, Serialize};

use crate::core::{BuildOptions, SuffixSet, VariantDescriptor};

/// Extra `mpiexec` flags needed when tests run as root inside a container.
const MPIEXEC_PREFLAGS: &str = "--allow-run-as-root;--oversubscribe";

/// FFT backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FftBackend {
    /// Use an FFTW installed by an earlier stage
    ExternalFftw,
    /// Let GROMACS download and build its own FFTW
    BuildOwnFftw,
}

/// Typed CMake configuration of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmakeOptions {
    pub install_bindir: String,
    pub install_libdir: String,
    pub c_compiler: &'static str,
    pub cxx_compiler: &'static str,
    pub mpi: bool,
    pub gpu: bool,
    pub simd: &'static str,
    pub rdtscp: bool,
    pub double: bool,
    pub fft: FftBackend,
    pub regression_tests: bool,
    pub binary_suffix: String,
    pub libs_suffix: String,
    /// Use the Ninja generator instead of the default one
    pub ninja: bool,
}

impl CmakeOptions {
    /// Derive the CMake options of a variant.
    pub fn for_variant(
        descriptor: &VariantDescriptor,
        suffixes: &SuffixSet,
        options: &BuildOptions,
    ) -> Self {
        let (c_compiler, cxx_compiler) = if options.mpi {
            ("mpicc", "mpicxx")
        } else {
            ("gcc", "g++")
        };

        let fft = if options.external_fftw {
            FftBackend::ExternalFftw
        } else {
            FftBackend::BuildOwnFftw
        };

        CmakeOptions {
            install_bindir: descriptor.tier.bin_dir_name(),
            install_libdir: descriptor.tier.lib_dir_name(),
            c_compiler,
            cxx_compiler,
            mpi: options.mpi,
            gpu: options.cuda,
            simd: descriptor.tier.suffix(),
            rdtscp: descriptor.rdtscp,
            double: options.double,
            fft,
            regression_tests: options.regtest,
            binary_suffix: suffixes.binary.clone(),
            libs_suffix: suffixes.library.clone(),
            ninja: options.external_fftw,
        }
    }

    /// Render as command-line arguments for `cmake`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            define("CMAKE_BUILD_TYPE", "Release"),
            define("CMAKE_INSTALL_BINDIR", &self.install_bindir),
            define("CMAKE_INSTALL_LIBDIR", &self.install_libdir),
            define("CMAKE_C_COMPILER", self.c_compiler),
            define("CMAKE_CXX_COMPILER", self.cxx_compiler),
            define("GMX_OPENMP", on_off(true)),
            define("GMX_MPI", on_off(self.mpi)),
            define("GMX_GPU", if self.gpu { "CUDA" } else { "OFF" }),
            define("GMX_SIMD", self.simd),
            define("GMX_USE_RDTSCP", on_off(self.rdtscp)),
            define("GMX_DOUBLE", on_off(self.double)),
        ];

        match self.fft {
            FftBackend::ExternalFftw => args.push(define("GMX_FFT_LIBRARY", "fftw3")),
            FftBackend::BuildOwnFftw => args.push(define("GMX_BUILD_OWN_FFTW", "ON")),
        }

        args.extend([
            define("GMX_EXTERNAL_BLAS", "OFF"),
            define("GMX_EXTERNAL_LAPACK", "OFF"),
            define("BUILD_SHARED_LIBS", "ON"),
            define("GMX_PREFER_STATIC_LIBS", "ON"),
            define("REGRESSIONTEST_DOWNLOAD", on_off(self.regression_tests)),
            define("GMX_DEFAULT_SUFFIX", "OFF"),
            define("GMX_BINARY_SUFFIX", &self.binary_suffix),
            define("GMX_LIBS_SUFFIX", &self.libs_suffix),
        ]);

        if self.mpi {
            args.push(define("MPIEXEC_PREFLAGS", MPIEXEC_PREFLAGS));
        }

        if self.ninja {
            args.push("-G".to_string());
            args.push("Ninja".to_string());
        }

        args
    }
}

fn define(name: &str, value: &str) -> String {
    format!("-D{}={}", name, value)
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "ON" } else { "OFF" }
}
