//! High-level operations.
//!
//! This module contains the implementation of the gmx-builds commands.

pub mod choose;
pub mod plan;
pub mod probe;

pub use choose::{choose, ChooseOptions};
pub use plan::{plan, MatrixOptions};
pub use probe::{flag_source, format_report, probe_host, ProbeReport};
