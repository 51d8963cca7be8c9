//! User-friendly diagnostic messages.
//!
//! Every error names its cause, the values involved, and a next step.

use std::fmt;
use std::path::PathBuf;

/// Suggestion messages shared by several diagnostics.
pub mod suggestions {
    /// Suggestion when an engine specification does not parse.
    pub const ENGINE_SYNTAX: &str = "Write engines as `simd=<tier>:rdtscp=<on|off>`";

    /// Suggestion when the host tier is unknown.
    pub const PROBE_HOST: &str = "Run `gmx-builds probe` to see which tier this host supports";

    /// Suggestion when selection is being debugged.
    pub const VERBOSE: &str = "Re-run with `--verbose` to see which directories were tried";
}

/// A diagnostic message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
    /// Related location (file path)
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            location: None,
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Add a file location.
    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let error_str = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        // Main message
        output.push_str(&format!("{}: {}\n", error_str, self.message));

        // Location if present
        if let Some(ref path) = self.location {
            output.push_str(&format!("  --> {}\n", path.display()));
        }

        // Context lines
        for ctx in &self.context {
            output.push_str(&format!("  → {}\n", ctx));
        }

        // Suggestions
        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::error("invalid value `bogus` for `simd`")
            .with_context("available values for `simd`: avx_512f, avx2, avx, sse2")
            .with_suggestion("Run `gmx-builds probe` to see the tier of this host");

        let output = diag.format(false);
        assert!(output.contains("error: invalid value"));
        assert!(output.contains("avx_512f, avx2, avx, sse2"));
        assert!(output.contains("help: consider:"));
        assert!(output.contains("1. Run `gmx-builds probe`"));
    }

    #[test]
    fn test_location_and_color() {
        let diag = Diagnostic::error("no appropriate GROMACS installation available for `gmx`")
            .with_location("/usr/local/gromacs");

        let plain = diag.format(false);
        assert!(plain.starts_with("error: no appropriate GROMACS installation"));
        assert!(plain.contains("  --> /usr/local/gromacs"));
        assert!(!plain.contains("help:"));

        let colored = diag.format(true);
        assert!(colored.starts_with("\x1b[1;31merror\x1b[0m: "));
    }
}
