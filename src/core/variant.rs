//! Variant specification parsing and validation.
//!
//! A variant is requested as `simd=<tier>:rdtscp=<on|off>`. Pairs are
//! separated by `:`, whitespace around pairs, keys and values is ignored.

use std::fmt;
use std::str::FromStr;

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::catalog::{legal_values, SimdTier, OPTION_KEYS, RDTSCP_KEY, SIMD_KEY};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// One requested build of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantDescriptor {
    /// SIMD tier the variant is compiled for
    pub tier: SimdTier,
    /// Whether the variant uses the RDTSCP timing instruction
    pub rdtscp: bool,
}

impl VariantDescriptor {
    pub fn new(tier: SimdTier, rdtscp: bool) -> Self {
        VariantDescriptor { tier, rdtscp }
    }

    /// Parse and validate a variant specification.
    pub fn parse(spec: &str) -> Result<Self, VariantError> {
        let mut tier = None;
        let mut rdtscp = None;

        for pair in spec.split(':').map(str::trim) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(VariantError::Malformed {
                    spec: spec.to_string(),
                    pair: pair.to_string(),
                });
            };
            let (key, value) = (key.trim(), value.trim());

            let Some(legal) = legal_values(key) else {
                return Err(VariantError::UnknownKey {
                    key: key.to_string(),
                    legal: OPTION_KEYS.iter().map(|k| k.to_string()).collect(),
                });
            };

            if !legal.iter().any(|v| *v == value) {
                return Err(VariantError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                    legal: legal.iter().map(|v| v.to_string()).collect(),
                });
            }

            let duplicate = match key {
                SIMD_KEY => tier.replace(SimdTier::from_name(value)).is_some(),
                _ => rdtscp.replace(value == "on").is_some(),
            };
            if duplicate {
                return Err(VariantError::DuplicateKey {
                    spec: spec.to_string(),
                    key: key.to_string(),
                });
            }
        }

        let tier = tier.flatten().ok_or_else(|| VariantError::MissingKey {
            spec: spec.to_string(),
            key: SIMD_KEY.to_string(),
        })?;
        let rdtscp = rdtscp.ok_or_else(|| VariantError::MissingKey {
            spec: spec.to_string(),
            key: RDTSCP_KEY.to_string(),
        })?;

        Ok(VariantDescriptor::new(tier, rdtscp))
    }
}

impl FromStr for VariantDescriptor {
    type Err = VariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantDescriptor::parse(s)
    }
}

impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}:{}={}",
            SIMD_KEY,
            self.tier.name(),
            RDTSCP_KEY,
            if self.rdtscp { "on" } else { "off" }
        )
    }
}

/// A variant specification that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum VariantError {
    #[error("`{key}` is not a valid engine key; available keys are: {}", .legal.join(", "))]
    #[diagnostic(code(gmx_builds::variant::unknown_key))]
    UnknownKey { key: String, legal: Vec<String> },

    #[error("`{value}` is not a valid value for key `{key}`; available values are: {}", .legal.join(", "))]
    #[diagnostic(code(gmx_builds::variant::invalid_value))]
    InvalidValue {
        key: String,
        value: String,
        legal: Vec<String>,
    },

    #[error("malformed engine specification `{spec}`: expected `key=value`, found `{pair}`")]
    #[diagnostic(
        code(gmx_builds::variant::malformed),
        help("engines are written as simd=<tier>:rdtscp=<on|off>")
    )]
    Malformed { spec: String, pair: String },

    #[error("engine specification `{spec}` sets `{key}` more than once")]
    #[diagnostic(code(gmx_builds::variant::duplicate_key))]
    DuplicateKey { spec: String, key: String },

    #[error("engine specification `{spec}` is missing the `{key}` key")]
    #[diagnostic(
        code(gmx_builds::variant::missing_key),
        help("engines are written as simd=<tier>:rdtscp=<on|off>")
    )]
    MissingKey { spec: String, key: String },
}

impl VariantError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            VariantError::UnknownKey { legal, .. } => diag
                .with_context(format!("available keys: {}", legal.join(", ")))
                .with_suggestion(suggestions::ENGINE_SYNTAX),
            VariantError::InvalidValue { key, legal, .. } => diag
                .with_context(format!("available values for `{}`: {}", key, legal.join(", ")))
                .with_suggestion(suggestions::PROBE_HOST),
            VariantError::Malformed { .. }
            | VariantError::DuplicateKey { .. }
            | VariantError::MissingKey { .. } => {
                diag.with_suggestion(suggestions::ENGINE_SYNTAX)
            }
        }
    }
}
