//! certbind
//!
//! Keeps the certificate store of an APISIX gateway in step with a TLS
//! certificate: exactly one object per certificate fingerprint and domain
//! set, with stale and conflicting copies removed.
//!
//! - **Fingerprinting**: SHA-256 over the DER certificate, turned into an
//!   ownership note stored in each uploaded object's `desc`
//! - **Relation**: multiset comparison of SNI lists
//! - **Gateway**: list / create / delete on the admin API `/ssls` resource
//! - **Reconciliation**: reuse, upload, cleanup and rollback
//! - **Plugin**: the stdin/stdout action protocol used by the host
//!
//! # Example
//!
//! ```ignore
//! use certbind::{CertificateMaterial, GatewayClient, Reconciler};
//! use certbind_config::ClientSettings;
//!
//! let client = GatewayClient::new(
//!     "http://127.0.0.1:9180/apisix/admin",
//!     admin_key,
//!     &ClientSettings::default(),
//! )?;
//! let outcome = Reconciler::new(client)
//!     .reconcile(&CertificateMaterial::new(cert_pem, key_pem), &domains)
//!     .await?;
//! ```

pub mod errors;
pub mod fingerprint;
pub mod gateway;
pub mod metadata;
pub mod plugin;
pub mod reconcile;
pub mod relation;

pub use errors::BindError;
pub use fingerprint::{fingerprint, FingerprintError};
pub use gateway::{CertStore, GatewayClient, GatewayError, RemoteCertObject};
pub use plugin::{handle, handle_input, upload_bind, PluginRequest, PluginResponse, Status};
pub use reconcile::{CertificateMaterial, Plan, ReconciliationOutcome, Reconciler};
pub use relation::Relation;
