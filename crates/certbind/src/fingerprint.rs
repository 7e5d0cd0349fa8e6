//! Certificate fingerprinting
//!
//! The fingerprint is the SHA-256 of the certificate's DER encoding, so the
//! same certificate yields the same value no matter how the PEM text is
//! wrapped, indented or followed by a chain.

use certbind_common::{Fingerprint, Note};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum FingerprintError {
    /// No PEM block could be decoded from the input
    #[error("failed to decode certificate PEM: {0}")]
    Decode(String),

    /// The PEM block does not hold a valid X.509 certificate
    #[error("failed to parse X.509 certificate: {0}")]
    Parse(String),
}

/// Fingerprint the first certificate in `cert_pem`.
pub fn fingerprint(cert_pem: &str) -> Result<Fingerprint, FingerprintError> {
    let block = pem::parse(cert_pem).map_err(|e| FingerprintError::Decode(e.to_string()))?;
    let contents = block.contents();

    let (rest, _cert) = x509_parser::parse_x509_certificate(contents)
        .map_err(|e| FingerprintError::Parse(e.to_string()))?;

    // The block must hold exactly one certificate.
    if !rest.is_empty() {
        return Err(FingerprintError::Parse(format!(
            "{} trailing bytes after certificate",
            rest.len()
        )));
    }

    let digest = hex::encode(Sha256::digest(contents));

    trace!(tag = %block.tag(), der_len = contents.len(), "Fingerprinted certificate");

    Fingerprint::from_hex(digest).map_err(|e| FingerprintError::Parse(e.to_string()))
}

/// Ownership note for the certificate in `cert_pem`.
pub fn note_for(cert_pem: &str) -> Result<Note, FingerprintError> {
    fingerprint(cert_pem).map(|fp| fp.note())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn self_signed(domains: &[&str]) -> rcgen::Certificate {
        let names = domains.iter().map(|d| d.to_string()).collect::<Vec<_>>();
        rcgen::generate_simple_self_signed(names).unwrap().cert
    }

    #[test]
    fn test_fingerprint_is_sha256_of_der() {
        let cert = self_signed(&["a.com"]);
        let expected = hex::encode(Sha256::digest(cert.der()));

        let fp = fingerprint(&cert.pem()).unwrap();
        assert_eq!(fp.as_str(), expected);
        assert_eq!(fp.as_str().len(), 64);
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let pem = self_signed(&["a.com", "b.com"]).pem();
        assert_eq!(fingerprint(&pem).unwrap(), fingerprint(&pem).unwrap());
    }

    #[test]
    fn test_fingerprint_ignores_surrounding_text() {
        let pem = self_signed(&["a.com"]).pem();
        let padded = format!("\n\n{pem}\n\n");
        assert_eq!(fingerprint(&pem).unwrap(), fingerprint(&padded).unwrap());
    }

    #[test]
    fn test_fingerprint_uses_first_block_of_chain() {
        let leaf = self_signed(&["a.com"]).pem();
        let issuer = self_signed(&["ca.example"]).pem();
        let chain = format!("{leaf}{issuer}");
        assert_eq!(fingerprint(&chain).unwrap(), fingerprint(&leaf).unwrap());
    }

    #[test]
    fn test_different_certificates_differ() {
        let a = fingerprint(&self_signed(&["a.com"]).pem()).unwrap();
        let b = fingerprint(&self_signed(&["a.com"]).pem()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_note_for_prefixes_fingerprint() {
        let pem = self_signed(&["a.com"]).pem();
        let note = note_for(&pem).unwrap();
        let fp = fingerprint(&pem).unwrap();
        assert_eq!(note.as_str(), format!("allinssl-{fp}"));
    }

    #[test]
    fn test_rejects_non_pem_input() {
        let err = fingerprint("not a certificate").unwrap_err();
        assert!(matches!(err, FingerprintError::Decode(_)));
    }

    #[test]
    fn test_rejects_trailing_bytes_after_der() {
        let mut der = self_signed(&["a.com"]).der().to_vec();
        der.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        let pem = pem::encode(&pem::Pem::new("CERTIFICATE", der));

        let err = fingerprint(&pem).unwrap_err();
        assert!(matches!(err, FingerprintError::Parse(_)));
        assert!(err.to_string().contains("4 trailing bytes"));
    }

    #[test]
    fn test_rejects_garbage_der() {
        let pem = "-----BEGIN CERTIFICATE-----\naGVsbG8gd29ybGQ=\n-----END CERTIFICATE-----\n";
        let err = fingerprint(pem).unwrap_err();
        assert!(matches!(err, FingerprintError::Parse(_)));
    }
}
