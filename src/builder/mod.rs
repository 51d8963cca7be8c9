//! Build-configuration side: the variant matrix and the CMake options of
//! each variant.

pub mod cmake;
pub mod matrix;

pub use cmake::{CmakeOptions, FftBackend};
pub use matrix::{generate, BuildConfiguration, BuildPlan, StepCommand};
