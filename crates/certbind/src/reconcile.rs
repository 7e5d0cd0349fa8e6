//! Certificate reconciliation
//!
//! Brings the gateway store to a state where exactly one object carries this
//! certificate's note with exactly the requested domains.
//!
//! # Flow
//!
//! 1. Fingerprint the certificate and derive its [`Note`]
//! 2. List every object in the store
//! 3. Build a [`Plan`]: a reuse candidate and the superseded objects
//! 4. Reuse candidate found: done, nothing is touched
//! 5. Otherwise upload, then delete superseded objects one by one. The first
//!    failed delete rolls back the upload and aborts.
//!
//! An object is superseded when either
//!
//! - it carries our note but its SNIs are not an exact match (stale), or
//! - it carries another note and its SNIs partially overlap ours (conflict).
//!
//! Superseded objects are only removed when an upload happens. When a
//! reuse candidate exists the plan's deletions are dropped.

use std::collections::HashSet;

use certbind_common::{CertObjectId, Note};
use tracing::{debug, error, info, trace, warn};

use crate::errors::BindError;
use crate::fingerprint;
use crate::gateway::{CertStore, CertUpload, GatewayError, RemoteCertObject};
use crate::relation::Relation;

/// PEM certificate and key to deploy.
#[derive(Clone)]
pub struct CertificateMaterial {
    pub cert_pem: String,
    pub key_pem: String,
}

impl CertificateMaterial {
    pub fn new(cert_pem: impl Into<String>, key_pem: impl Into<String>) -> Self {
        Self {
            cert_pem: cert_pem.into(),
            key_pem: key_pem.into(),
        }
    }
}

impl std::fmt::Debug for CertificateMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateMaterial")
            .field("cert_len", &self.cert_pem.len())
            .field("key_pem", &"<redacted>")
            .finish()
    }
}

/// Decisions derived from one listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// First owned object with an exact SNI match
    pub reuse: Option<CertObjectId>,
    /// Objects to delete after a fresh upload, in listing order, no duplicates
    pub superseded: Vec<CertObjectId>,
}

impl Plan {
    pub fn build(note: &Note, domains: &[String], objects: &[RemoteCertObject]) -> Self {
        let mut plan = Plan::default();
        let mut seen = HashSet::new();

        for obj in objects {
            let Some(id) = obj.id.as_ref() else {
                trace!(desc = %obj.desc, "Ignoring certificate object without id");
                continue;
            };

            let relation = obj
                .snis
                .as_deref()
                .map_or(Relation::Disjoint, |snis| Relation::classify(snis, domains));
            let owned = note.matches(&obj.desc);

            let stale = owned && !relation.is_exact();
            let conflicting = relation == Relation::Partial && !owned;
            if (stale || conflicting) && seen.insert(id.clone()) {
                trace!(id = %id, relation = %relation, owned, "Marked certificate object as superseded");
                plan.superseded.push(id.clone());
            }

            if owned && relation.is_exact() && plan.reuse.is_none() {
                plan.reuse = Some(id.clone());
            }
        }

        plan
    }
}

/// Result of a successful reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationOutcome {
    /// Existing object that already satisfied the request
    pub matched_id: Option<CertObjectId>,
    /// Object created by this call
    pub uploaded_id: Option<CertObjectId>,
    /// Objects removed after the upload
    pub to_delete: Vec<CertObjectId>,
    pub created: bool,
}

impl ReconciliationOutcome {
    pub fn message(&self) -> &'static str {
        if self.created {
            "uploaded and bound"
        } else {
            "already bound"
        }
    }
}

/// Drives a [`CertStore`] towards the desired binding.
pub struct Reconciler<S> {
    store: S,
}

impl<S: CertStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reconcile `material` bound to `domains`.
    ///
    /// Remote calls are issued strictly one after another.
    pub async fn reconcile(
        &self,
        material: &CertificateMaterial,
        domains: &[String],
    ) -> Result<ReconciliationOutcome, BindError> {
        let note = fingerprint::note_for(&material.cert_pem)?;
        debug!(note = %note, domains = ?domains, "Reconciling certificate");

        let objects = self
            .store
            .list()
            .await
            .map_err(BindError::UpstreamUnavailable)?;

        let plan = Plan::build(&note, domains, &objects);
        debug!(
            listed = objects.len(),
            superseded = plan.superseded.len(),
            reuse = ?plan.reuse,
            "Built reconciliation plan"
        );

        if let Some(matched) = plan.reuse {
            if !plan.superseded.is_empty() {
                debug!(
                    skipped = plan.superseded.len(),
                    "Certificate already bound, leaving superseded objects in place"
                );
            }
            info!(id = %matched, "Certificate already bound");
            return Ok(ReconciliationOutcome {
                matched_id: Some(matched),
                uploaded_id: None,
                to_delete: Vec::new(),
                created: false,
            });
        }

        let upload = CertUpload {
            cert: &material.cert_pem,
            key: &material.key_pem,
            desc: note.as_str(),
            snis: domains,
        };
        let uploaded = self
            .store
            .create(&upload)
            .await
            .map_err(BindError::UploadFailed)?;
        if uploaded.is_empty() {
            return Err(BindError::UploadFailed(GatewayError::Protocol(
                "gateway returned an empty identifier".to_string(),
            )));
        }
        info!(id = %uploaded, "Uploaded certificate");

        self.remove_superseded(&uploaded, &plan.superseded).await?;

        info!(
            id = %uploaded,
            removed = plan.superseded.len(),
            "Certificate uploaded and bound"
        );
        Ok(ReconciliationOutcome {
            matched_id: None,
            uploaded_id: Some(uploaded),
            to_delete: plan.superseded,
            created: true,
        })
    }

    /// Delete `superseded` in order, stopping at the first failure.
    async fn remove_superseded(
        &self,
        uploaded: &CertObjectId,
        superseded: &[CertObjectId],
    ) -> Result<(), BindError> {
        for id in superseded {
            if let Err(source) = self.store.delete(id).await {
                warn!(id = %id, error = %source, "Failed to delete superseded certificate");
                self.rollback(uploaded).await;
                return Err(BindError::CleanupFailed {
                    uploaded: uploaded.clone(),
                    cause: Box::new(BindError::DeleteFailed {
                        id: id.clone(),
                        source,
                    }),
                });
            }
            debug!(id = %id, "Deleted superseded certificate");
        }
        Ok(())
    }

    /// Best effort: a failure here is logged and never returned.
    async fn rollback(&self, uploaded: &CertObjectId) {
        match self.store.delete(uploaded).await {
            Ok(()) => info!(id = %uploaded, "Rolled back uploaded certificate"),
            Err(e) => error!(id = %uploaded, error = %e, "Failed to roll back uploaded certificate"),
        }
    }
}
