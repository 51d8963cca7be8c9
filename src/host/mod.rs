//! Host capability detection.

pub mod errors;
pub mod flags;
pub mod probe;

pub use errors::{ConfigurationError, ProbeError};
pub use flags::{host_flag_source, CpuInfoFlags, FlagSource, HostFlags, StaticFlags, SysctlFlags};
pub use probe::{probe, HostCapabilities};
