//! Host probing error types and diagnostics.

use thiserror::Error;

use crate::core::catalog::tier_names;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// No way to read CPU feature flags on this platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("no CPU feature probe is available for platform `{os}`")]
    UnsupportedPlatform { os: String },
}

impl ConfigurationError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ConfigurationError::UnsupportedPlatform { os } => {
                Diagnostic::error(format!("cannot detect CPU features on `{}`", os))
                    .with_context("flags are read from /proc/cpuinfo (Linux) or sysctl (macOS)")
                    .with_suggestion("Pass the engines explicitly with `--engines`")
                    .with_suggestion(suggestions::ENGINE_SYNTAX)
            }
        }
    }
}

/// Host feature flags could not be read or mapped to a tier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("failed to read CPU feature flags from {source_name}: {message}")]
    Unreadable { source_name: String, message: String },

    #[error("none of the supported SIMD tiers ({}) is available on this host", tier_names().join(", "))]
    NoMatchingTier { flags: Vec<String> },
}

impl ProbeError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ProbeError::Unreadable { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Check that the feature flag source is readable"),
            ProbeError::NoMatchingTier { flags } => {
                let mut diag = Diagnostic::error(self.to_string());
                if flags.is_empty() {
                    diag = diag.with_context("the host reported no feature flags");
                } else {
                    diag = diag.with_context(format!("host flags: {}", flags.join(" ")));
                }
                diag.with_suggestion("This host needs at least SSE2 to run any GROMACS build")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_tier_diagnostic() {
        let err = ProbeError::NoMatchingTier {
            flags: vec!["fp".to_string(), "asimd".to_string()],
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("avx_512f, avx2, avx, sse2"));
        assert!(output.contains("host flags: fp asimd"));
    }

    #[test]
    fn test_unsupported_platform_diagnostic() {
        let err = ConfigurationError::UnsupportedPlatform {
            os: "windows".to_string(),
        };

        let output = err.to_diagnostic().format(false);
        assert!(output.contains("cannot detect CPU features on `windows`"));
        assert!(output.contains("--engines"));
    }
}
