//! In-memory document store honouring the port's ordering and failure
//! contract: stable earliest-`created_at` ordering with insertion-order
//! ties, transient faults on demand.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde_json::Value;

use hire_os_core::ports::{Document, DocumentStore, FilterValue, Result};
use hire_os_core::types::Collection;
use hire_os_core::HireOsError;

struct StoredDoc {
    doc: Document,
    created_at: DateTime<Utc>,
    seq: u64,
}

struct Inner {
    collections: HashMap<Collection, Vec<StoredDoc>>,
    next_seq: u64,
    fault: Option<String>,
}

/// Test double for the document store. Documents are inserted by test setup
/// only; the layer under test never writes.
pub struct MemDocumentStore {
    inner: Mutex<Inner>,
}

impl MemDocumentStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                collections: HashMap::new(),
                next_seq: 0,
                fault: None,
            }),
        }
    }

    /// Insert a document. Stamps `created_at` at insertion when the document
    /// does not carry one, the way the real store does. The stamp is
    /// deterministic (fixed base time plus insertion sequence) so repeated
    /// aggregation stays byte-identical.
    pub fn insert(&self, collection: Collection, mut doc: Document) {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let carried = doc
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc));
        let created_at = match carried {
            Some(t) => t,
            None => {
                let stamped = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::seconds(seq as i64);
                if let Some(map) = doc.as_object_mut() {
                    map.insert(
                        "created_at".to_string(),
                        Value::String(stamped.to_rfc3339_opts(SecondsFormat::Secs, true)),
                    );
                }
                stamped
            }
        };

        inner
            .collections
            .entry(collection)
            .or_default()
            .push(StoredDoc {
                doc,
                created_at,
                seq,
            });
    }

    /// Make every subsequent call fail with a transient fault.
    pub fn set_fault(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().fault = Some(message.into());
    }

    pub fn clear_fault(&self) {
        self.inner.lock().unwrap().fault = None;
    }

    fn query(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Vec<Document>> {
        let inner = self.inner.lock().unwrap();
        if let Some(message) = &inner.fault {
            return Err(HireOsError::TransientStoreFault(anyhow::anyhow!(
                "{message}"
            )));
        }
        let wanted = value.as_json();
        let mut hits: Vec<&StoredDoc> = inner
            .collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| d.doc.get(field) == Some(&wanted))
                    .collect()
            })
            .unwrap_or_default();
        hits.sort_by_key(|d| (d.created_at, d.seq));
        Ok(hits.into_iter().map(|d| d.doc.clone()).collect())
    }
}

impl Default for MemDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Document>> {
        Ok(self.query(collection, field, value)?.into_iter().next())
    }

    async fn find_many(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Vec<Document>> {
        self.query(collection, field, value)
    }
}
