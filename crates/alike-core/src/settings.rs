//! Comparator configuration.

use crate::error::{AlikeError, AlikeResult};
use serde::Deserialize;

/// How strictly attributes are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrMode {
    /// `current` may carry extra attributes; zero-length target attributes
    /// and `srcref` are never checked.
    #[default]
    Default,
    /// Zero-length target attributes must match too, and `srcref` is
    /// compared when present.
    Extended,
    /// Attribute sets must match exactly and no wildcard exemptions apply.
    Strict,
}

/// Settings for one comparison.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Attribute comparison mode.
    pub attr_mode: AttrMode,
    /// Maximum recursion depth through nested values and expressions.
    pub max_depth: usize,
    /// Maximum number of scope pairs tracked on the recursion stack.
    pub env_limit: usize,
    /// Character budget for rendered messages.
    pub nchar_max: usize,
    /// Width used when deparsing values into diagnostics.
    pub width: usize,
    /// Longest double vector checked for integer-likeness (0 = never).
    pub fuzzy_int_max_len: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            attr_mode: AttrMode::Default,
            max_depth: 256,
            env_limit: 65536,
            nchar_max: 65536,
            width: 80,
            fuzzy_int_max_len: 100,
        }
    }
}

impl Settings {
    /// Settings with a given attribute mode and defaults otherwise.
    pub fn with_attr_mode(attr_mode: AttrMode) -> Self {
        Self {
            attr_mode,
            ..Self::default()
        }
    }

    pub fn is_strict(&self) -> bool {
        self.attr_mode == AttrMode::Strict
    }

    /// Reject settings the comparator cannot work with.
    pub fn validate(&self) -> AlikeResult<()> {
        if self.max_depth == 0 {
            return Err(AlikeError::InvalidSettings {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.env_limit == 0 {
            return Err(AlikeError::InvalidSettings {
                field: "env_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.nchar_max < 8 {
            return Err(AlikeError::InvalidSettings {
                field: "nchar_max",
                reason: format!("{} is too small to hold a message", self.nchar_max),
            });
        }
        if self.width == 0 {
            return Err(AlikeError::InvalidSettings {
                field: "width",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
        assert!(!Settings::default().is_strict());
    }

    #[test]
    fn test_rejects_zero_depth() {
        let settings = Settings {
            max_depth: 0,
            ..Settings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(AlikeError::InvalidSettings {
                field: "max_depth",
                reason: "must be at least 1".to_string(),
            })
        );
    }

    #[test]
    fn test_rejects_tiny_budget() {
        let settings = Settings {
            nchar_max: 3,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
