//! Hire OS test harness — an in-memory document store with the same
//! ordering and failure contract as the Postgres adapter, plus scenario
//! tests (in `tests/`) exercised through the `DirectoryService` boundary.

pub mod memory;

pub use memory::MemDocumentStore;

/// Initialise test logging once; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}
