//! The two identifier representations used across the document chain.
//!
//! `NativeRef` is the store-generated identifier used for document-to-document
//! joins; it is compared in native form and stringified only at the external
//! boundary. `UserRef` is the externally issued account identifier; the store
//! never generates or interprets it, so it stays opaque text. Conversions
//! between text and native form live here and nowhere else. Mixing the two
//! representations in a join filter is what this module exists to prevent.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HireOsError;

// ── NativeRef ─────────────────────────────────────────────────

/// Store-native reference identifier (generated at insertion, immutable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NativeRef(Uuid);

impl NativeRef {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Parse the canonical text encoding back into a native reference.
    ///
    /// `context` names the field being parsed so the caller can diagnose a
    /// malformed key without retrying. Fails on wrong length or alphabet.
    pub fn parse(context: &str, value: &str) -> Result<Self, HireOsError> {
        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| HireOsError::invalid_key(context, value))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for NativeRef {
    /// Canonical external text form; total, every reference has one.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

// ── UserRef ───────────────────────────────────────────────────

/// Opaque externally-issued user identifier.
///
/// Format-validated but never interpreted: no parsing into [`NativeRef`],
/// no assumptions about the issuing scheme. Compared and stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef(String);

impl UserRef {
    pub fn new(value: impl Into<String>) -> Result<Self, HireOsError> {
        let value = value.into();
        if value.trim().is_empty() || value.chars().any(|c| c.is_control()) {
            return Err(HireOsError::invalid_key("user_ref", value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
