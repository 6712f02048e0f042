//! Declared record shapes per collection, decoded at the store boundary.
//!
//! Documents come off the store as untyped JSON. Every record type here has a
//! `from_document` constructor that applies the collection's normalization
//! rules and then validates field by field; a document that does not decode
//! is a [`HireOsError::DataIntegrity`] naming the collection and field, never
//! a panic and never a silently half-read record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HireOsError;
use crate::keys::{NativeRef, UserRef};
use crate::normalize;
use crate::ports::Document;

// ── Collection ────────────────────────────────────────────────

/// The document collections this layer reads. Never writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Organisations,
    Jobs,
    Users,
    OnboardingConfig,
    BasicDetails,
    JobApplications,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organisations => "organisations",
            Self::Jobs => "jobs",
            Self::Users => "users",
            Self::OnboardingConfig => "onboarding_config",
            Self::BasicDetails => "basic_details",
            Self::JobApplications => "job_applications",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "organisations" => Some(Self::Organisations),
            "jobs" => Some(Self::Jobs),
            "users" => Some(Self::Users),
            "onboarding_config" => Some(Self::OnboardingConfig),
            "basic_details" => Some(Self::BasicDetails),
            "job_applications" => Some(Self::JobApplications),
            _ => None,
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Field extraction helpers ──────────────────────────────────

fn object(collection: Collection, doc: &Document) -> Result<&Map<String, Value>, HireOsError> {
    doc.as_object()
        .ok_or_else(|| HireOsError::integrity(collection, "<document>", "not a JSON object"))
}

fn req_str<'a>(
    collection: Collection,
    map: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, HireOsError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(HireOsError::integrity(
            collection,
            field,
            format!("expected string, found {other}"),
        )),
        None => Err(HireOsError::integrity(collection, field, "missing field")),
    }
}

fn opt_str(map: &Map<String, Value>, field: &str) -> Option<String> {
    match map.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn req_ref(
    collection: Collection,
    map: &Map<String, Value>,
    field: &str,
) -> Result<NativeRef, HireOsError> {
    let raw = req_str(collection, map, field)?;
    NativeRef::parse(field, raw)
        .map_err(|_| HireOsError::integrity(collection, field, format!("{raw:?} is not a native reference")))
}

fn req_user(
    collection: Collection,
    map: &Map<String, Value>,
    field: &str,
) -> Result<UserRef, HireOsError> {
    let raw = req_str(collection, map, field)?;
    UserRef::new(raw)
        .map_err(|_| HireOsError::integrity(collection, field, format!("{raw:?} is not a user reference")))
}

fn req_time(
    collection: Collection,
    map: &Map<String, Value>,
    field: &str,
) -> Result<DateTime<Utc>, HireOsError> {
    let raw = req_str(collection, map, field)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| HireOsError::integrity(collection, field, format!("{raw:?}: {e}")))
}

fn opt_time(map: &Map<String, Value>, field: &str) -> Option<DateTime<Utc>> {
    match map.get(field) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok(),
        _ => None,
    }
}

fn bool_or(map: &Map<String, Value>, field: &str, default: bool) -> bool {
    match map.get(field) {
        Some(Value::Bool(b)) => *b,
        _ => default,
    }
}

fn i64_or(map: &Map<String, Value>, field: &str, default: i64) -> i64 {
    match map.get(field) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(default),
        _ => default,
    }
}

fn f64_opt(map: &Map<String, Value>, field: &str) -> Option<f64> {
    match map.get(field) {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

// ── Organisation ──────────────────────────────────────────────

/// An organisation record. Created once at onboarding by an upstream
/// collaborator; `created_by` holds the owning user's external identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    #[serde(rename = "_id")]
    pub id: NativeRef,
    pub created_by: UserRef,
    pub name: String,
    pub size: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub use_case: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Organisation {
    pub fn from_document(doc: Document) -> Result<Self, HireOsError> {
        let collection = Collection::Organisations;
        let doc = normalize::normalize_document(collection, doc);
        let map = object(collection, &doc)?;
        Ok(Self {
            id: req_ref(collection, map, "_id")?,
            created_by: req_user(collection, map, "created_by")?,
            name: req_str(collection, map, "name")?.to_string(),
            size: opt_str(map, "size"),
            industry: opt_str(map, "industry"),
            website: opt_str(map, "website"),
            contact_email: opt_str(map, "contact_email"),
            use_case: opt_str(map, "use_case"),
            created_at: req_time(collection, map, "created_at")?,
            updated_at: opt_time(map, "updated_at"),
        })
    }
}

// ── Job ───────────────────────────────────────────────────────

/// A job posting. `org_id` must hold the owning organisation's native
/// reference; a job whose `org_id` does not decode as one is a
/// data-integrity fault, not an empty result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: NativeRef,
    /// External job identifier used by per-job collections (opaque text).
    pub job_ref: Option<String>,
    pub org_id: NativeRef,
    pub title: String,
    pub company: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub priority: String,
    pub status: Option<String>,
    pub total_applicants: i64,
    pub new_applicants: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn from_document(doc: Document) -> Result<Self, HireOsError> {
        let collection = Collection::Jobs;
        let doc = normalize::normalize_document(collection, doc);
        let map = object(collection, &doc)?;
        Ok(Self {
            id: req_ref(collection, map, "_id")?,
            job_ref: opt_str(map, "job_id"),
            org_id: req_ref(collection, map, "org_id")?,
            title: req_str(collection, map, "title")?.to_string(),
            company: opt_str(map, "company"),
            department: opt_str(map, "department"),
            location: opt_str(map, "location"),
            priority: req_str(collection, map, "priority")?.to_string(),
            status: opt_str(map, "status"),
            total_applicants: i64_or(map, "total_applicants", 0),
            new_applicants: i64_or(map, "new_applicants", 0),
            created_at: req_time(collection, map, "created_at")?,
            updated_at: opt_time(map, "updated_at"),
        })
    }
}

// ── Per-user onboarding records ───────────────────────────────

/// Copilot/onboarding configuration, keyed directly by user reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingConfig {
    pub user_id: UserRef,
    /// Free-form automation toggles submitted at onboarding.
    pub automation: Value,
    pub calendar_integration: Option<String>,
    pub email_integration: Option<String>,
    pub ats_selected: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl OnboardingConfig {
    pub fn from_document(doc: Document) -> Result<Self, HireOsError> {
        let collection = Collection::OnboardingConfig;
        let doc = normalize::normalize_document(collection, doc);
        let map = object(collection, &doc)?;
        Ok(Self {
            user_id: req_user(collection, map, "user_id")?,
            automation: map.get("automation").cloned().unwrap_or(Value::Object(Map::new())),
            calendar_integration: opt_str(map, "calendar_integration"),
            email_integration: opt_str(map, "email_integration"),
            ats_selected: opt_str(map, "ats_selected"),
            created_at: req_time(collection, map, "created_at")?,
        })
    }
}

/// Basic profile details captured at onboarding, keyed by user reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicDetails {
    pub user_id: UserRef,
    pub full_name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub onboarding_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl BasicDetails {
    pub fn from_document(doc: Document) -> Result<Self, HireOsError> {
        let collection = Collection::BasicDetails;
        let doc = normalize::normalize_document(collection, doc);
        let map = object(collection, &doc)?;
        Ok(Self {
            user_id: req_user(collection, map, "user_id")?,
            full_name: req_str(collection, map, "full_name")?.to_string(),
            email: opt_str(map, "email"),
            location: opt_str(map, "location"),
            onboarding_complete: bool_or(map, "onboarding_complete", false),
            created_at: req_time(collection, map, "created_at")?,
        })
    }
}

/// Per-user flags from the users collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserFlags {
    pub user_id: UserRef,
    pub is_onboarded: bool,
    pub onboarding_completed_at: Option<DateTime<Utc>>,
}

impl UserFlags {
    pub fn from_document(doc: Document) -> Result<Self, HireOsError> {
        let collection = Collection::Users;
        let doc = normalize::normalize_document(collection, doc);
        let map = object(collection, &doc)?;
        Ok(Self {
            user_id: req_user(collection, map, "user_id")?,
            is_onboarded: bool_or(map, "is_onboarded", false),
            onboarding_completed_at: opt_time(map, "onboarding_completed_at"),
        })
    }
}

// ── Applicant ─────────────────────────────────────────────────

/// An applicant entry embedded in a job's application document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub applicant_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub status: Option<String>,
    pub match_score: Option<f64>,
    pub is_shortlisted: bool,
    pub applied_date: Option<DateTime<Utc>>,
}

impl Applicant {
    pub fn from_document(doc: &Document) -> Result<Self, HireOsError> {
        let collection = Collection::JobApplications;
        let map = object(collection, doc)?;
        Ok(Self {
            applicant_id: opt_str(map, "applicant_id"),
            name: req_str(collection, map, "name")?.to_string(),
            email: opt_str(map, "email"),
            status: opt_str(map, "status"),
            match_score: f64_opt(map, "match_score"),
            is_shortlisted: bool_or(map, "is_shortlisted", false),
            applied_date: opt_time(map, "applied_date"),
        })
    }
}
