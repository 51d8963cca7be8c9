//! Host probing for the command line.

use anyhow::Result;
use serde::Serialize;

use crate::core::catalog::SimdTier;
use crate::host::{host_flag_source, probe, FlagSource, HostCapabilities, StaticFlags};

/// Flag source for `flags`, or the running host when `None`.
pub fn flag_source(flags: Option<&str>) -> Result<Box<dyn FlagSource>> {
    match flags {
        Some(flags) => Ok(Box::new(StaticFlags::new(flags))),
        None => Ok(host_flag_source()?),
    }
}

/// Probe the host, or an explicit flag string.
pub fn probe_host(flags: Option<&str>) -> Result<HostCapabilities> {
    let source = flag_source(flags)?;
    Ok(probe(source.as_ref())?)
}

/// Summary of a probe for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub best_tier: SimdTier,
    pub rdtscp: bool,
    /// Every tier the host can run, most specialized first
    pub supported_tiers: Vec<SimdTier>,
    /// Engine specification the host would build by default
    pub default_engine: String,
}

impl ProbeReport {
    pub fn new(host: &HostCapabilities) -> Self {
        ProbeReport {
            best_tier: host.best_tier,
            rdtscp: host.rdtscp,
            supported_tiers: SimdTier::all().filter(|t| host.supports(*t)).collect(),
            default_engine: host.default_variant().to_string(),
        }
    }
}

/// Format a probe report for terminal output.
pub fn format_report(report: &ProbeReport) -> String {
    let tiers: Vec<_> = report.supported_tiers.iter().map(|t| t.name()).collect();
    format!(
        "best tier:       {}\nrdtscp:          {}\nsupported tiers: {}\ndefault engine:  {}\n",
        report.best_tier,
        if report.rdtscp { "on" } else { "off" },
        tiers.join(", "),
        report.default_engine
    )
}
