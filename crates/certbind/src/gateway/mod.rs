//! Gateway certificate store access
//!
//! The reconciler only needs three operations on the remote store, captured
//! by [`CertStore`]. [`GatewayClient`] implements them against the APISIX
//! admin API:
//!
//! | Operation | Request                 | Success means                         |
//! |-----------|-------------------------|---------------------------------------|
//! | list      | `GET {base}/ssls`       | body has a `list` container           |
//! | create    | `POST {base}/ssls`      | `code == 200` and a `data.key`        |
//! | delete    | `DELETE {base}/ssls/id` | `deleted` set, `key` ends with the id |
//!
//! Every request carries `X-API-KEY`. Nothing is retried.

mod client;
mod error;
mod object;

pub use client::{GatewayClient, API_KEY_HEADER};
pub use error::GatewayError;
pub use object::{CertUpload, RemoteCertObject};

use async_trait::async_trait;
use certbind_common::CertObjectId;

/// Remote certificate store.
#[async_trait]
pub trait CertStore: Send + Sync {
    /// All certificate objects currently in the store.
    async fn list(&self) -> Result<Vec<RemoteCertObject>, GatewayError>;

    /// Upload a certificate object and return its gateway-assigned id.
    async fn create(&self, upload: &CertUpload<'_>) -> Result<CertObjectId, GatewayError>;

    /// Delete one certificate object.
    async fn delete(&self, id: &CertObjectId) -> Result<(), GatewayError>;
}
