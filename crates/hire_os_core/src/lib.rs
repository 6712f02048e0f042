//! Hire OS core — pure domain logic for the recruitment directory.
//!
//! Resolves a user identity into the chain of documents that belong to it
//! (organisation → jobs, plus the per-user onboarding records) and assembles
//! one normalized aggregate view. Depends only on the [`ports::DocumentStore`]
//! trait; the same logic runs against Postgres (`hire_os_postgres`) or the
//! in-memory test store (`hire_os_harness`).

pub mod error;
pub mod keys;
pub mod normalize;
pub mod ports;
pub mod resolve;
pub mod service;
pub mod types;

pub use error::HireOsError;
pub use keys::{NativeRef, UserRef};
pub use ports::{Document, DocumentStore, FilterValue, Result};
pub use service::{AggregateView, DirectoryService, DirectoryServiceImpl};
pub use types::Collection;
