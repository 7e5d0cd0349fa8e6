//! Certificate fingerprints and ownership notes.
//!
//! A [`Note`] is written into the `desc` field of every certificate object
//! certbind uploads. It is the only ownership marker on the gateway side, so
//! its format must stay stable across releases.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Prefix of every ownership note.
pub const NOTE_PREFIX: &str = "allinssl-";

/// Length of a hex-encoded SHA-256 digest.
const FINGERPRINT_HEX_LEN: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid fingerprint {0:?}: expected 64 lowercase hex characters")]
pub struct InvalidFingerprint(pub String);

/// Lowercase hex SHA-256 digest of a certificate's DER encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Result<Self, InvalidFingerprint> {
        let hex = hex.into();
        let well_formed = hex.len() == FINGERPRINT_HEX_LEN
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !well_formed {
            return Err(InvalidFingerprint(hex));
        }
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ownership note derived from this fingerprint.
    pub fn note(&self) -> Note {
        Note(format!("{NOTE_PREFIX}{}", self.0))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ownership tag stored in a gateway object's `desc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Note(String);

impl Note {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether a gateway `desc` value carries this note.
    pub fn matches(&self, desc: &str) -> bool {
        self.0 == desc
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
