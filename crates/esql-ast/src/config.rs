//! Parser configuration
//!
//! Defaults come from [`ParseOptions::default`]; environment variables
//! override them when present:
//!
//! - `ESQL_AST_COLLECT_ERRORS`: `true`/`false`
//! - `ESQL_AST_MAX_ERRORS`: maximum number of syntax errors reported

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value}")]
    InvalidEnvVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Report error fragments and missing tokens in `ParseResult::errors`.
    pub collect_errors: bool,

    /// Upper bound on reported syntax errors. The AST is built regardless.
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            collect_errors: true,
            max_errors: 100,
        }
    }
}

impl ParseOptions {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Ok(value) = std::env::var("ESQL_AST_COLLECT_ERRORS") {
            options.collect_errors = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidEnvVar {
                        var: "ESQL_AST_COLLECT_ERRORS",
                        value,
                    })
                }
            };
        }
        if let Ok(value) = std::env::var("ESQL_AST_MAX_ERRORS") {
            options.max_errors = value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                var: "ESQL_AST_MAX_ERRORS",
                value: value.clone(),
            })?;
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(options.collect_errors);
        assert_eq!(options.max_errors, 100);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"max_errors": 3}"#).unwrap();
        assert!(options.collect_errors);
        assert_eq!(options.max_errors, 3);
    }

    // Both variables are handled in one test so parallel tests never race on
    // the process environment.
    #[test]
    fn test_env_var_override() {
        std::env::set_var("ESQL_AST_COLLECT_ERRORS", "false");
        std::env::set_var("ESQL_AST_MAX_ERRORS", "7");
        let options = ParseOptions::from_env().unwrap();
        assert!(!options.collect_errors);
        assert_eq!(options.max_errors, 7);

        std::env::set_var("ESQL_AST_MAX_ERRORS", "many");
        let err = ParseOptions::from_env().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for ESQL_AST_MAX_ERRORS: many");

        std::env::remove_var("ESQL_AST_COLLECT_ERRORS");
        std::env::remove_var("ESQL_AST_MAX_ERRORS");
        assert_eq!(ParseOptions::from_env().unwrap(), ParseOptions::default());
    }
}
