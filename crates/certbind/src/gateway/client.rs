//! HTTP client for the APISIX admin API `/ssls` resource.

use async_trait::async_trait;
use certbind_common::CertObjectId;
use certbind_config::ClientSettings;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::error::GatewayError;
use super::object::{CertUpload, RemoteCertObject};
use super::CertStore;

/// Header carrying the admin key on every request.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// `code` value the admin API returns on a successful upload.
const UPLOAD_OK_CODE: f64 = 200.0;

/// Admin API client bound to one gateway and one admin key.
pub struct GatewayClient {
    http: Client,
    base_url: String,
    admin_key: String,
}

impl GatewayClient {
    /// Create a client for `server_address`.
    ///
    /// No request is made here.
    pub fn new(
        server_address: &str,
        admin_key: &str,
        settings: &ClientSettings,
    ) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(settings.user_agent());
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: server_address.trim_end_matches('/').to_string(),
            admin_key: admin_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode the response body as a JSON object.
    ///
    /// The HTTP status is not checked: the admin API reports failures in
    /// the body, and callers inspect the fields they need.
    async fn send(&self, request: RequestBuilder) -> Result<Map<String, Value>, GatewayError> {
        let response = request
            .header(API_KEY_HEADER, &self.admin_key)
            .send()
            .await?;

        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        trace!(url = %url, status = %status, body_len = body.len(), "Admin API response");

        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(GatewayError::protocol(format!(
                "response from {url} (HTTP {status}) is not a JSON object"
            ))),
            Err(e) => Err(GatewayError::protocol(format!(
                "response from {url} (HTTP {status}) is not valid JSON: {e}"
            ))),
        }
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("admin_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CertStore for GatewayClient {
    async fn list(&self) -> Result<Vec<RemoteCertObject>, GatewayError> {
        let res = self.send(self.http.get(self.url("/ssls"))).await?;

        let entries: Vec<&Value> = match res.get("list") {
            Some(Value::Object(list)) => list.values().collect(),
            Some(Value::Array(list)) => list.iter().collect(),
            _ => {
                return Err(GatewayError::protocol(
                    "invalid response format: list not found",
                ))
            }
        };

        let mut objects = Vec::with_capacity(entries.len());
        for entry in entries {
            if !entry.is_object() {
                return Err(GatewayError::protocol(
                    "invalid response format: certificate entry is not an object",
                ));
            }
            match RemoteCertObject::from_entry(entry) {
                Some(obj) => objects.push(obj),
                None => trace!("Skipping certificate entry without a value object"),
            }
        }

        debug!(count = objects.len(), "Listed gateway certificates");
        Ok(objects)
    }

    async fn create(&self, upload: &CertUpload<'_>) -> Result<CertObjectId, GatewayError> {
        let res = self
            .send(self.http.post(self.url("/ssls")).json(upload))
            .await?;

        let code = res
            .get("code")
            .and_then(Value::as_f64)
            .ok_or_else(|| GatewayError::protocol("invalid response format: code not found"))?;

        if code != UPLOAD_OK_CODE {
            let msg = res.get("msg").map(render).unwrap_or_default();
            return Err(GatewayError::protocol(format!(
                "gateway rejected upload (code {code}): {msg}"
            )));
        }

        let key = res
            .get("data")
            .and_then(Value::as_object)
            .ok_or_else(|| GatewayError::protocol("invalid response format: data not found"))?
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::protocol("invalid response format: key not found"))?;

        if key.is_empty() {
            return Err(GatewayError::protocol("gateway returned an empty identifier"));
        }

        debug!(id = %key, desc = %upload.desc, "Uploaded certificate");
        Ok(CertObjectId::from(key))
    }

    async fn delete(&self, id: &CertObjectId) -> Result<(), GatewayError> {
        let res = self
            .send(self.http.delete(self.url(&format!("/ssls/{id}"))))
            .await?;

        if !is_confirmed(res.get("deleted")) {
            let message = res.get("message").map(render).unwrap_or_default();
            return Err(GatewayError::protocol(format!(
                "gateway did not confirm deletion of {id}: {message}"
            )));
        }

        let key = res
            .get("key")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::protocol("invalid response format: key not found"))?;

        if last_segment(key) != id.as_str() {
            return Err(GatewayError::protocol(format!(
                "deleted key mismatch: expected {id}, got {key}"
            )));
        }

        debug!(id = %id, "Deleted certificate");
        Ok(())
    }
}

/// The admin API answers `"deleted": "1"`; numbers and `true` are accepted too.
fn is_confirmed(deleted: Option<&Value>) -> bool {
    match deleted {
        Some(Value::String(_)) => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// Final segment of an etcd-style key such as `/apisix/ssls/42`.
fn last_segment(key: &str) -> &str {
    let trimmed = key.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
