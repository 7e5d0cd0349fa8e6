//! HTTP client settings read from the process environment.
//!
//! | Variable                 | Meaning                                   |
//! |--------------------------|-------------------------------------------|
//! | `CERTBIND_TIMEOUT_SECS`  | Per-request timeout, unset = no timeout   |
//! | `CERTBIND_USER_AGENT`    | `User-Agent` sent to the admin API        |

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "CERTBIND_";

/// Settings for the admin API client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Override for the `User-Agent` header
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ClientSettings {
    /// Load settings from `CERTBIND_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings: ClientSettings = envy::prefixed(ENV_PREFIX).from_env()?;
        debug!(?settings, "Loaded client settings from environment");
        Ok(settings)
    }

    /// Load settings from explicit key/value pairs (keys carry the prefix).
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(vars)?)
    }

    /// Request timeout, `None` leaves the transport default in place.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("certbind/{}", env!("CARGO_PKG_VERSION")))
    }
}
