//! Common types shared across certbind crates.

pub mod ids;
#[cfg(feature = "runtime")]
pub mod logging;
pub mod note;

pub use ids::{CertObjectId, CorrelationId};
pub use note::{Fingerprint, InvalidFingerprint, Note, NOTE_PREFIX};
