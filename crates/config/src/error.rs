//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Parameters were not a JSON object, or a field had the wrong type
    #[error("malformed parameters: {0}")]
    Malformed(String),

    /// Parameters parsed but failed validation
    #[error("invalid parameters: {0}")]
    Invalid(String),

    #[error("invalid environment settings: {0}")]
    Env(#[from] envy::Error),
}
