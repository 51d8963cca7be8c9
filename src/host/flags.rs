//! Sources of host CPU feature flags.
//!
//! The flag string is platform specific: the `flags` line of
//! `/proc/cpuinfo` on Linux, the `machdep.cpu.*` sysctl keys on macOS.
//! [`StaticFlags`] stands in for either when the flags are already known.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::core::catalog::{SimdTier, RDTSCP_FLAG};
use crate::host::errors::{ConfigurationError, ProbeError};
use crate::util::fs::read_to_string;
use crate::util::process::{find_executable, ProcessBuilder};

/// Something that can report the host's raw CPU feature flags.
pub trait FlagSource {
    /// Human-readable name of the source, used in errors.
    fn name(&self) -> String;

    /// Read the raw, whitespace-separated flag string.
    fn read_flags(&self) -> Result<String, ProbeError>;
}

/// Reads the first `flags` line of `/proc/cpuinfo`.
#[derive(Debug, Clone)]
pub struct CpuInfoFlags {
    path: PathBuf,
}

impl CpuInfoFlags {
    pub fn new() -> Self {
        CpuInfoFlags::at("/proc/cpuinfo")
    }

    /// Read from a cpuinfo-formatted file at another location.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        CpuInfoFlags { path: path.into() }
    }
}

impl Default for CpuInfoFlags {
    fn default() -> Self {
        CpuInfoFlags::new()
    }
}

impl FlagSource for CpuInfoFlags {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn read_flags(&self) -> Result<String, ProbeError> {
        let contents = read_to_string(&self.path).map_err(|e| ProbeError::Unreadable {
            source_name: self.name(),
            message: format!("{:#}", e),
        })?;

        contents
            .lines()
            .find(|line| line.starts_with("flags"))
            .map(|line| line.split_once(':').map_or(line, |(_, flags)| flags).to_string())
            .ok_or_else(|| ProbeError::Unreadable {
                source_name: self.name(),
                message: "no `flags` line found".to_string(),
            })
    }
}

/// Queries `sysctl` for the CPU feature keys (macOS).
#[derive(Debug, Clone, Default)]
pub struct SysctlFlags;

impl SysctlFlags {
    const KEYS: &'static [&'static str] = &[
        "machdep.cpu.features",
        "machdep.cpu.leaf7_features",
        "machdep.cpu.extfeatures",
    ];
}

impl FlagSource for SysctlFlags {
    fn name(&self) -> String {
        "sysctl".to_string()
    }

    fn read_flags(&self) -> Result<String, ProbeError> {
        let sysctl = find_executable("sysctl").unwrap_or_else(|| PathBuf::from("/usr/sbin/sysctl"));

        // Keys missing on older CPUs make sysctl fail, so query them one by one.
        let mut flags = Vec::new();
        for key in Self::KEYS {
            match ProcessBuilder::new(&sysctl).arg("-n").arg(key).exec_and_check() {
                Ok(output) => {
                    flags.push(String::from_utf8_lossy(&output.stdout).trim().to_string())
                }
                Err(e) => tracing::debug!("sysctl key {} unavailable: {:#}", key, e),
            }
        }

        if flags.is_empty() {
            return Err(ProbeError::Unreadable {
                source_name: self.name(),
                message: format!("none of {} could be read", Self::KEYS.join(", ")),
            });
        }

        Ok(flags.join(" "))
    }
}

/// A fixed flag string.
#[derive(Debug, Clone, Default)]
pub struct StaticFlags(pub String);

impl StaticFlags {
    pub fn new(flags: impl Into<String>) -> Self {
        StaticFlags(flags.into())
    }
}

impl FlagSource for StaticFlags {
    fn name(&self) -> String {
        "static flags".to_string()
    }

    fn read_flags(&self) -> Result<String, ProbeError> {
        Ok(self.0.clone())
    }
}

/// Pick the flag source for the running platform.
pub fn host_flag_source() -> Result<Box<dyn FlagSource>, ConfigurationError> {
    match std::env::consts::OS {
        "linux" | "android" => Ok(Box::new(CpuInfoFlags::new())),
        "macos" => Ok(Box::new(SysctlFlags)),
        os => Err(ConfigurationError::UnsupportedPlatform { os: os.to_string() }),
    }
}

/// Tokenized, case-normalized host flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFlags {
    tokens: BTreeSet<String>,
}

impl HostFlags {
    /// Split a raw flag string on whitespace, lowercasing each token.
    pub fn parse(raw: &str) -> Self {
        HostFlags {
            tokens: raw.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// Whether a single flag token is present.
    pub fn contains(&self, flag: &str) -> bool {
        self.tokens.contains(&flag.to_lowercase())
    }

    /// Whether the host advertises the instruction set of `tier`.
    pub fn supports(&self, tier: SimdTier) -> bool {
        tier.info().host_flags.iter().any(|flag| self.contains(flag))
    }

    /// Whether the host advertises RDTSCP.
    pub fn has_rdtscp(&self) -> bool {
        self.contains(RDTSCP_FLAG)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in sorted order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}
