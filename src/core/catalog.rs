//! Capability catalog.
//!
//! Static, ordered facts about the SIMD tiers GROMACS can be built for,
//! the RDTSCP toggle, and the naming tokens shared by the build and
//! runtime sides. Nothing here is computed at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Program base name of the engine.
pub const PROGRAM_NAME: &str = "gmx";

/// Fixed installation root of every variant.
pub const INSTALL_ROOT: &str = "/usr/local/gromacs";

/// Directory (relative to the install root) holding the wrapper scripts.
pub const SCRIPTS_DIR: &str = "scripts";

/// Option key selecting the SIMD tier.
pub const SIMD_KEY: &str = "simd";

/// Option key selecting the RDTSCP toggle.
pub const RDTSCP_KEY: &str = "rdtscp";

/// All option keys accepted in a variant specification.
pub const OPTION_KEYS: &[&str] = &[SIMD_KEY, RDTSCP_KEY];

/// Legal values of the `rdtscp` key.
pub const RDTSCP_VALUES: &[&str] = &["on", "off"];

/// Host flag token advertising the RDTSCP instruction.
pub const RDTSCP_FLAG: &str = "rdtscp";

/// Suffix token for MPI-enabled builds.
pub const MPI_SUFFIX: &str = "_mpi";

/// Suffix token for double precision builds.
pub const DOUBLE_SUFFIX: &str = "_d";

/// Suffix token for RDTSCP-enabled builds.
pub const RDTSCP_SUFFIX: &str = "_rdtscp";

/// A SIMD capability tier.
///
/// Declaration order is priority order: most specialized first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimdTier {
    #[serde(rename = "avx_512f")]
    Avx512F,
    Avx2,
    Avx,
    Sse2,
}

/// Catalog entry for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierInfo {
    pub tier: SimdTier,
    /// Rank in the catalog, 0 = most specialized.
    pub rank: usize,
    /// Name used in variant specifications (`simd=<name>`).
    pub name: &'static str,
    /// Suffix of the `bin.` / `lib.` install directories, also the
    /// value passed to `GMX_SIMD`.
    pub suffix: &'static str,
    /// Host feature flag tokens (lowercase) that evidence this tier.
    pub host_flags: &'static [&'static str],
}

/// The tier catalog, most to least specialized.
pub const TIERS: &[TierInfo] = &[
    TierInfo {
        tier: SimdTier::Avx512F,
        rank: 0,
        name: "avx_512f",
        suffix: "AVX_512",
        host_flags: &["avx512f"],
    },
    TierInfo {
        tier: SimdTier::Avx2,
        rank: 1,
        name: "avx2",
        suffix: "AVX2_256",
        host_flags: &["avx2"],
    },
    TierInfo {
        tier: SimdTier::Avx,
        rank: 2,
        name: "avx",
        suffix: "AVX_256",
        host_flags: &["avx", "avx1.0"],
    },
    TierInfo {
        tier: SimdTier::Sse2,
        rank: 3,
        name: "sse2",
        suffix: "SSE2",
        host_flags: &["sse2"],
    },
];

impl SimdTier {
    /// All tiers, most to least specialized.
    pub fn all() -> impl Iterator<Item = SimdTier> {
        TIERS.iter().map(|info| info.tier)
    }

    /// The single most specialized tier of the catalog.
    pub fn most_specialized() -> SimdTier {
        TIERS[0].tier
    }

    /// Catalog entry for this tier.
    pub fn info(&self) -> &'static TierInfo {
        // TIERS is declared in enum order
        &TIERS[*self as usize]
    }

    /// External name used in variant specifications.
    pub fn name(&self) -> &'static str {
        self.info().name
    }

    /// Install directory suffix (e.g. `AVX2_256`).
    pub fn suffix(&self) -> &'static str {
        self.info().suffix
    }

    /// Priority rank, 0 = most specialized.
    pub fn rank(&self) -> usize {
        self.info().rank
    }

    /// Name of the binary directory for this tier (`bin.AVX2_256`).
    pub fn bin_dir_name(&self) -> String {
        format!("bin.{}", self.suffix())
    }

    /// Name of the library directory for this tier (`lib.AVX2_256`).
    pub fn lib_dir_name(&self) -> String {
        format!("lib.{}", self.suffix())
    }

    /// Look up a tier by its external name.
    pub fn from_name(name: &str) -> Option<SimdTier> {
        TIERS.iter().find(|info| info.name == name).map(|info| info.tier)
    }
}

impl fmt::Display for SimdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// External tier names in catalog order.
pub fn tier_names() -> Vec<&'static str> {
    TIERS.iter().map(|info| info.name).collect()
}

/// Legal values for an option key, or `None` if the key is unknown.
pub fn legal_values(key: &str) -> Option<Vec<&'static str>> {
    match key {
        SIMD_KEY => Some(tier_names()),
        RDTSCP_KEY => Some(RDTSCP_VALUES.to_vec()),
        _ => None,
    }
}

/// Every variant specification the catalog can express.
#[cfg(test)]
pub(crate) fn all_variant_specs() -> Vec<String> {
    let mut specs = Vec::new();
    for info in TIERS.iter().rev() {
        for rdtscp in ["off", "on"] {
            specs.push(format!(
                "{}={}:{}={}",
                SIMD_KEY, info.name, RDTSCP_KEY, rdtscp
            ));
        }
    }
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_ranked_in_declaration_order() {
        for (i, info) in TIERS.iter().enumerate() {
            assert_eq!(info.rank, i);
            assert_eq!(info.tier as usize, i);
            assert_eq!(info.tier.info(), info);
        }
        assert_eq!(SimdTier::most_specialized(), SimdTier::Avx512F);
    }

    #[test]
    fn test_enum_order_matches_priority() {
        let tiers: Vec<_> = SimdTier::all().collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
    }

    #[test]
    fn test_name_and_suffix_mapping() {
        assert_eq!(SimdTier::from_name("avx_512f"), Some(SimdTier::Avx512F));
        assert_eq!(SimdTier::Avx2.suffix(), "AVX2_256");
        assert_eq!(SimdTier::Avx.bin_dir_name(), "bin.AVX_256");
        assert_eq!(SimdTier::Sse2.lib_dir_name(), "lib.SSE2");
        assert_eq!(SimdTier::from_name("avx512"), None);
    }

    #[test]
    fn test_legal_values() {
        assert_eq!(
            legal_values("simd").unwrap(),
            vec!["avx_512f", "avx2", "avx", "sse2"]
        );
        assert_eq!(legal_values("rdtscp").unwrap(), vec!["on", "off"]);
        assert!(legal_values("gpu").is_none());
    }

    #[test]
    fn test_all_variant_specs() {
        let specs = all_variant_specs();
        assert_eq!(specs.len(), 8);
        assert_eq!(specs[0], "simd=sse2:rdtscp=off");
        assert!(specs.contains(&"simd=avx_512f:rdtscp=on".to_string()));
    }
}
