//! Certificate objects as the admin API reports them.

use certbind_common::CertObjectId;
use serde::Serialize;
use serde_json::Value;

/// One certificate object in the gateway store.
///
/// Listings are parsed leniently: a missing `id` or a malformed `snis` list
/// does not fail the listing, it only limits what the reconciler may do
/// with the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCertObject {
    /// Gateway identifier, absent on some deployments
    pub id: Option<CertObjectId>,
    /// Free-form description, holds the ownership note for managed objects
    pub desc: String,
    /// Bound SNI names, `None` when missing or not a list of strings
    pub snis: Option<Vec<String>>,
}

impl RemoteCertObject {
    /// Parse a listing entry shaped `{"value": {"id", "desc", "snis"}}`.
    ///
    /// Returns `None` when the entry has no `value` object.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        let value = entry.get("value")?.as_object()?;

        let id = value
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .map(CertObjectId::from);

        let desc = value
            .get("desc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let snis = value.get("snis").and_then(Value::as_array).and_then(|names| {
            names
                .iter()
                .map(|name| name.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        });

        Some(Self { id, desc, snis })
    }
}

/// Body of a certificate upload.
#[derive(Debug, Clone, Serialize)]
pub struct CertUpload<'a> {
    pub cert: &'a str,
    pub key: &'a str,
    pub desc: &'a str,
    pub snis: &'a [String],
}
