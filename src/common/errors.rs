//! Error types for the strategy engine

use thiserror::Error;

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Non-positive price, budget or power, or an out-of-range config value.
    ///
    /// The engine that raised it is left untouched, so the caller can retry
    /// on the next tick.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Persisted state was produced under a different strategy config
    #[error("Config hash mismatch: expected {expected}, found {found}")]
    ConfigMismatch { expected: String, found: String },

    /// Bisection ran out of iterations before reaching the tolerance
    #[error("Root not found after {iterations} iterations (best estimate {best})")]
    RootNotFound { best: f64, iterations: usize },

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors while reading replay input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Shorthand for building an `InvalidConfiguration` error
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidConfiguration(message.into())
    }
}

impl From<config::ConfigError> for EngineError {
    fn from(err: config::ConfigError) -> Self {
        EngineError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = EngineError::invalid("price must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: price must be positive"
        );

        let err = EngineError::ConfigMismatch {
            expected: "abc".to_string(),
            found: "def".to_string(),
        };
        assert!(err.to_string().contains("expected abc"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: EngineError = parse.unwrap_err().into();
        assert!(matches!(err, EngineError::JsonParse(_)));
    }
}
