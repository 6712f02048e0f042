//! Postgres implementation of the document-store port.
//!
//! Documents live in a single JSONB table (`hire_os.documents`) keyed by
//! collection name. Field filters use `@>` containment against a one-field
//! JSON object, so a native-reference filter only ever matches its canonical
//! text encoding. All SQL is runtime-checked (`sqlx::query_scalar`, not the
//! `query!` macros) so the crate builds without a database present.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use hire_os_core::ports::{Document, DocumentStore, FilterValue, Result};
use hire_os_core::types::Collection;
use hire_os_core::HireOsError;

/// Postgres-backed document store. Newtype over the pool; cheap to clone
/// via `PgPool`'s internal sharing.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The containment document a filter compares against.
fn filter_doc(field: &str, value: &FilterValue) -> Document {
    serde_json::json!({ field: value.as_json() })
}

/// Connectivity and pool faults are retryable by the caller; everything else
/// (bad SQL, decode failures) is internal.
fn map_store_error(e: sqlx::Error) -> HireOsError {
    use sqlx::Error as E;
    let transient = matches!(
        &e,
        E::Io(_) | E::Tls(_) | E::PoolTimedOut | E::PoolClosed | E::WorkerCrashed
    );
    if transient {
        HireOsError::TransientStoreFault(anyhow::Error::from(e))
    } else {
        HireOsError::Internal(anyhow::Error::from(e))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn find_one(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Option<Document>> {
        debug!(collection = %collection, field, "find_one");
        sqlx::query_scalar::<_, Document>(
            r#"
            SELECT doc
            FROM hire_os.documents
            WHERE collection = $1
              AND doc @> $2
            ORDER BY created_at ASC, seq ASC
            LIMIT 1
            "#,
        )
        .bind(collection.as_str())
        .bind(filter_doc(field, value))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_store_error)
    }

    async fn find_many(
        &self,
        collection: Collection,
        field: &str,
        value: &FilterValue,
    ) -> Result<Vec<Document>> {
        debug!(collection = %collection, field, "find_many");
        sqlx::query_scalar::<_, Document>(
            r#"
            SELECT doc
            FROM hire_os.documents
            WHERE collection = $1
              AND doc @> $2
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(collection.as_str())
        .bind(filter_doc(field, value))
        .fetch_all(&self.pool)
        .await
        .map_err(map_store_error)
    }
}
