//! The `upload_bind` caller contract.
//!
//! The host hands us an untyped `params` object. It is converted into a
//! [`BindRequest`] exactly once, here, so nothing downstream ever touches raw
//! JSON. Any problem is reported before a single network call is made.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;
use validator::{Validate, ValidationError};

use crate::error::ConfigError;

/// Validated parameters of one `upload_bind` call.
#[derive(Clone, Deserialize, Validate)]
pub struct BindRequest {
    /// PEM certificate (chain allowed, first block is fingerprinted)
    #[validate(length(min = 1, message = "cert is required"))]
    pub cert: String,

    /// PEM private key, forwarded to the gateway untouched
    #[validate(length(min = 1, message = "key is required"))]
    pub key: String,

    /// Value of the `X-API-KEY` header
    #[validate(length(min = 1, message = "admin_key is required"))]
    pub admin_key: String,

    /// Admin API base, e.g. `http://127.0.0.1:9180/apisix/admin`
    #[validate(
        length(min = 1, message = "server_address is required"),
        custom(function = "validate_server_address")
    )]
    pub server_address: String,

    /// Domains the certificate must be bound to
    #[validate(length(min = 1, message = "domain must contain at least one name"))]
    pub domain: Vec<String>,
}

impl BindRequest {
    /// Build a request from the host's `params` value.
    pub fn from_params(params: Value) -> Result<Self, ConfigError> {
        if !params.is_object() {
            return Err(ConfigError::Malformed(
                "params must be a JSON object".to_string(),
            ));
        }

        let request: BindRequest =
            serde_json::from_value(params).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        request
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        debug!(
            server_address = %request.server_address,
            domain_count = request.domain.len(),
            "Validated upload_bind parameters"
        );

        Ok(request)
    }
}

// Secrets stay out of logs.
impl fmt::Debug for BindRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindRequest")
            .field("cert_len", &self.cert.len())
            .field("key", &"<redacted>")
            .field("admin_key", &"<redacted>")
            .field("server_address", &self.server_address)
            .field("domain", &self.domain)
            .finish()
    }
}

fn validate_server_address(value: &str) -> Result<(), ValidationError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(ValidationError::new("server_address")
            .with_message("server_address must be an http(s) URL".into())),
    }
}
