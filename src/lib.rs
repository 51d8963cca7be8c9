//! gmx-builds - GROMACS multi-variant build planning and runtime selection
//!
//! This crate plans one GROMACS build per requested SIMD tier and RDTSCP
//! setting, then picks the most specialized installed build the executing
//! host can run.

pub mod builder;
pub mod core;
pub mod host;
pub mod ops;
pub mod runtime;
pub mod util;

/// Test fixtures for gmx-builds unit tests.
#[cfg(test)]
pub mod test_support;

pub use builder::{BuildConfiguration, BuildPlan};
pub use core::{BuildOptions, SimdTier, VariantDescriptor, VariantError};
pub use host::{HostCapabilities, ProbeError};
pub use runtime::{SelectError, Selection, Selector};
