//! Errors surfaced by a reconciliation.
//!
//! Every variant is terminal for the current call.

use certbind_common::CertObjectId;
use certbind_config::ConfigError;
use thiserror::Error;

use crate::fingerprint::FingerprintError;
use crate::gateway::GatewayError;

#[derive(Debug, Error)]
pub enum BindError {
    /// Caller parameters missing or mistyped; nothing was sent to the gateway
    #[error(transparent)]
    InvalidParameters(#[from] ConfigError),

    #[error("invalid certificate: {0}")]
    InvalidCertificate(#[from] FingerprintError),

    /// Listing failed, nothing was changed
    #[error("failed to list certificates from gateway: {0}")]
    UpstreamUnavailable(#[source] GatewayError),

    #[error("failed to upload certificate: {0}")]
    UploadFailed(#[source] GatewayError),

    #[error("failed to delete old certificate {id}: {source}")]
    DeleteFailed {
        id: CertObjectId,
        #[source]
        source: GatewayError,
    },

    /// A superseded object could not be removed after a successful upload.
    /// `cause` is the original deletion failure.
    #[error("cleanup after uploading {uploaded} failed: {cause}")]
    CleanupFailed {
        uploaded: CertObjectId,
        #[source]
        cause: Box<BindError>,
    },
}

impl BindError {
    /// Stable name of the variant, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameters(_) => "invalid_parameters",
            Self::InvalidCertificate(_) => "invalid_certificate",
            Self::UpstreamUnavailable(_) => "upstream_unavailable",
            Self::UploadFailed(_) => "upload_failed",
            Self::DeleteFailed { .. } => "delete_failed",
            Self::CleanupFailed { .. } => "cleanup_failed",
        }
    }
}
