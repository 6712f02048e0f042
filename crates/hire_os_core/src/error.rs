use thiserror::Error;

/// Error taxonomy for identity resolution.
///
/// Absence is never an error: a missing document is `None` / a presence flag
/// in the aggregate view. Every variant here is scoped to one resolution
/// request; nothing is fatal to the process.
#[derive(Debug, Error)]
pub enum HireOsError {
    /// Malformed identifier supplied by the caller. Not retryable.
    #[error("invalid key format for {context}: {value:?}")]
    InvalidKeyFormat { context: String, value: String },

    /// Connectivity/timeout fault from the store. The caller owns retry
    /// policy; this layer never retries.
    #[error("transient store fault: {0}")]
    TransientStoreFault(#[source] anyhow::Error),

    /// A stored document's keys or shape do not decode as the collection
    /// declares. Upstream data-quality defect, not retryable.
    #[error("data integrity fault in {collection}.{field}: {detail}")]
    DataIntegrity {
        collection: String,
        field: String,
        detail: String,
    },

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl HireOsError {
    pub fn invalid_key(context: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidKeyFormat {
            context: context.into(),
            value: value.into(),
        }
    }

    pub fn integrity(
        collection: crate::types::Collection,
        field: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::DataIntegrity {
            collection: collection.as_str().to_string(),
            field: field.into(),
            detail: detail.into(),
        }
    }

    /// True for faults that are safe to retry externally with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStoreFault(_))
    }
}
