//! Parameter and settings handling for certbind.
//!
//! Two inputs reach the core from outside:
//!
//! - [`BindRequest`] - the per-call parameters sent by the host
//! - [`ClientSettings`] - process-wide HTTP client knobs from `CERTBIND_*`

mod error;
mod request;
mod settings;

pub use error::ConfigError;
pub use request::BindRequest;
pub use settings::{ClientSettings, ENV_PREFIX};
