//! Plugin protocol
//!
//! The host writes one `{"action", "params"}` document to stdin and reads
//! one `{"status", "message", "result"}` document from stdout. Failures are
//! reported in the document, never through the exit code.

use std::fmt;

use certbind_common::CorrelationId;
use certbind_config::{BindRequest, ClientSettings};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info_span, warn, Instrument};

use crate::errors::BindError;
use crate::gateway::GatewayClient;
use crate::metadata::metadata;
use crate::reconcile::{CertificateMaterial, ReconciliationOutcome, Reconciler};

pub const ACTION_GET_METADATA: &str = "get_metadata";
pub const ACTION_LIST_ACTIONS: &str = "list_actions";
pub const ACTION_UPLOAD_BIND: &str = "upload_bind";

/// Request sent by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginRequest {
    pub action: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Response returned to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginResponse {
    pub status: Status,
    pub message: String,
    pub result: Value,
}

impl PluginResponse {
    pub fn success(message: impl Into<String>, result: Value) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            result,
        }
    }

    /// Error response with message `"<context>: <err>"`.
    pub fn error(context: &str, err: impl fmt::Display) -> Self {
        Self {
            status: Status::Error,
            message: format!("{context}: {err}"),
            result: Value::Null,
        }
    }

    fn bound(outcome: &ReconciliationOutcome) -> Self {
        let (result_message, certificate_id) = if outcome.created {
            ("bound", outcome.uploaded_id.as_ref())
        } else {
            ("already bound", outcome.matched_id.as_ref())
        };

        Self::success(
            format!("certificate {}", outcome.message()),
            json!({
                "message": result_message,
                "created": outcome.created,
                "certificate_id": certificate_id,
                "removed": outcome.to_delete,
            }),
        )
    }
}

/// Handle a raw request document.
pub async fn handle_input(input: &[u8], settings: &ClientSettings) -> PluginResponse {
    match serde_json::from_slice::<PluginRequest>(input) {
        Ok(request) => handle(request, settings).await,
        Err(e) => PluginResponse::error("failed to parse request", e),
    }
}

/// Dispatch one request on its action name.
pub async fn handle(request: PluginRequest, settings: &ClientSettings) -> PluginResponse {
    match request.action.as_str() {
        ACTION_GET_METADATA => match metadata().map(serde_json::to_value) {
            Ok(Ok(meta)) => PluginResponse::success("plugin metadata", meta),
            Ok(Err(e)) => PluginResponse::error("failed to load plugin metadata", e),
            Err(e) => PluginResponse::error("failed to load plugin metadata", e),
        },
        ACTION_LIST_ACTIONS => match metadata() {
            Ok(meta) => PluginResponse::success(
                "supported actions",
                json!({ "actions": meta.actions }),
            ),
            Err(e) => PluginResponse::error("failed to load plugin metadata", e),
        },
        ACTION_UPLOAD_BIND => {
            let span = info_span!("upload_bind", correlation_id = %CorrelationId::new());
            match upload_bind(request.params, settings).instrument(span).await {
                Ok(outcome) => PluginResponse::bound(&outcome),
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "upload_bind failed");
                    PluginResponse::error("upload_bind failed", e)
                }
            }
        }
        other => PluginResponse {
            status: Status::Error,
            message: format!("unknown action: {other}"),
            result: Value::Null,
        },
    }
}

/// Validate `params` and reconcile against the gateway they name.
pub async fn upload_bind(
    params: Value,
    settings: &ClientSettings,
) -> Result<ReconciliationOutcome, BindError> {
    let request = BindRequest::from_params(params)?;
    let client = GatewayClient::new(&request.server_address, &request.admin_key, settings)
        .map_err(BindError::UpstreamUnavailable)?;

    let material = CertificateMaterial::new(request.cert, request.key);
    Reconciler::new(client)
        .reconcile(&material, &request.domain)
        .await
}
