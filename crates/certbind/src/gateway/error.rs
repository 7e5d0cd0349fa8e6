//! Admin API error types.

use thiserror::Error;

/// Failure talking to the gateway admin API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The request never produced a response body
    #[error("transport error: {0}")]
    Transport(String),

    /// A response arrived but did not say what we needed it to say
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
