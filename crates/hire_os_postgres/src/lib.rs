//! Postgres adapter for the Hire OS document-store port.
//! Core logic never depends on this crate, only on the port trait.

pub mod config;
pub mod store;

pub use config::{connect_from_env, ensure_schema};
pub use store::PgDocumentStore;
