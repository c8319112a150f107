//! Null value handling for raw field text

use serde::{Deserialize, Serialize};

/// Which raw strings count as "no value"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NullConfig {
    /// Patterns to treat as null
    pub patterns: Vec<String>,

    /// Whether to trim whitespace before checking
    pub trim_whitespace: bool,

    /// Case sensitive matching
    pub case_sensitive: bool,
}

impl Default for NullConfig {
    fn default() -> Self {
        Self {
            patterns: ["", "-", "N/A", "NA", "NaN", "null", "None"]
                .into_iter()
                .map(String::from)
                .collect(),
            trim_whitespace: true,
            case_sensitive: false,
        }
    }
}

impl NullConfig {
    /// Check if a raw value should be treated as missing
    pub fn is_null(&self, raw: &str) -> bool {
        let value = if self.trim_whitespace { raw.trim() } else { raw };

        self.patterns.iter().any(|pattern| {
            if self.case_sensitive {
                value == pattern
            } else {
                value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Add a null pattern, ignoring duplicates
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let config = NullConfig::default();
        assert!(config.is_null(""));
        assert!(config.is_null("  n/a "));
        assert!(config.is_null("NULL"));
        assert!(!config.is_null("abc"));
        assert!(!config.is_null("0"));
    }

    #[test]
    fn test_case_sensitive() {
        let config = NullConfig {
            case_sensitive: true,
            ..NullConfig::default()
        }
        .with_pattern("missing");
        assert!(config.is_null("missing"));
        assert!(!config.is_null("MISSING"));
        assert!(!config.is_null("NULL"));
    }
}
