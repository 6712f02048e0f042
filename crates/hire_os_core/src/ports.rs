//! Document-store port trait — core logic depends only on this.
//! Implemented by `hire_os_postgres` (JSONB tables) and by the in-memory
//! store in `hire_os_harness`.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HireOsError;
use crate::keys::NativeRef;
use crate::types::Collection;

pub type Result<T> = std::result::Result<T, HireOsError>;

/// A raw document as the store holds it, before normalization.
pub type Document = Value;

/// A lookup value in the representation the target field actually stores.
///
/// The caller picks the variant, which is the type-correctness step the whole
/// chain depends on: joins on store-generated identifiers use `Ref`, lookups
/// on externally issued text use `Text`. There is no implicit conversion
/// between the two.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Ref(NativeRef),
    Text(String),
}

impl FilterValue {
    /// The JSON encoding adapters compare against. A `Ref` encodes as its
    /// canonical text form, which is the only form documents may store
    /// native references in.
    pub fn as_json(&self) -> Value {
        match self {
            Self::Ref(r) => Value::String(r.to_string()),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ref(r) => write!(f, "{r}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Read-only access to the document store.
///
/// Ordering contract: results are stably ordered by earliest `created_at`,
/// ties broken by insertion order. `find_one` returns the first document of
/// that ordering; duplicate matches are an upstream data-quality condition,
/// never an error here.
///
/// Failure contract: implementations return
/// [`HireOsError::TransientStoreFault`] for connectivity/timeout faults and
/// [`HireOsError::Internal`] for anything else. Absence is `Ok(None)` /
/// `Ok(vec![])`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Document>>;

    async fn find_many(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Vec<Document>>;
}
