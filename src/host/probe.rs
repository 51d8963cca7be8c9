//! Host capability probe.

use crate::core::catalog::SimdTier;
use crate::core::VariantDescriptor;
use crate::host::errors::ProbeError;
use crate::host::flags::{FlagSource, HostFlags};

/// What the executing host can run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCapabilities {
    /// All reported feature flags
    pub flags: HostFlags,
    /// Most specialized tier the host supports
    pub best_tier: SimdTier,
    /// Whether the RDTSCP instruction is available
    pub rdtscp: bool,
}

impl HostCapabilities {
    /// Derive capabilities from a raw flag string.
    pub fn from_flags(raw: &str) -> Result<Self, ProbeError> {
        let flags = HostFlags::parse(raw);

        let best_tier = SimdTier::all()
            .find(|tier| flags.supports(*tier))
            .ok_or_else(|| ProbeError::NoMatchingTier {
                flags: flags.tokens().map(str::to_string).collect(),
            })?;

        let rdtscp = flags.has_rdtscp();

        Ok(HostCapabilities {
            flags,
            best_tier,
            rdtscp,
        })
    }

    /// Whether the host supports `tier`.
    pub fn supports(&self, tier: SimdTier) -> bool {
        self.flags.supports(tier)
    }

    /// The variant best suited to this host, used when none is requested.
    pub fn default_variant(&self) -> VariantDescriptor {
        VariantDescriptor::new(self.best_tier, self.rdtscp)
    }
}

/// Probe the host through `source`.
pub fn probe(source: &dyn FlagSource) -> Result<HostCapabilities, ProbeError> {
    let raw = source.read_flags()?;
    let caps = HostCapabilities::from_flags(&raw)?;

    tracing::debug!(
        "host flags from {}: best tier {}, rdtscp {}",
        source.name(),
        caps.best_tier,
        caps.rdtscp
    );

    Ok(caps)
}
