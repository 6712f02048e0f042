//! DirectoryService — the aggregation boundary consumed by the HTTP layer.
//!
//! Takes the store port via `Arc<dyn DocumentStore>` so the same logic works
//! against Postgres (`hire_os_postgres`) or the in-memory test store
//! (`hire_os_harness`). Every lookup is read-only; the independent per-user
//! lookups run concurrently and only the jobs lookup is sequenced behind the
//! organisation lookup, whose result supplies its key.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{NativeRef, UserRef};
use crate::ports::{DocumentStore, Result};
use crate::resolve::{self, OrgChainOutcome};
use crate::types::{Applicant, BasicDetails, Job, OnboardingConfig, Organisation};

// ── View types ────────────────────────────────────────────────

/// The merged, normalized result of all lookups for one user.
///
/// Missing sections are flagged, never omitted and never substituted with
/// placeholder data. Serialization is deterministic: repeated aggregation
/// against unchanged backing data yields byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateView {
    pub user_id: String,
    pub organisation_found: bool,
    pub organisation: Option<Organisation>,
    pub jobs_count: usize,
    pub jobs: Vec<Job>,
    pub onboarding_config_found: bool,
    pub onboarding_config: Option<OnboardingConfig>,
    pub basic_details_found: bool,
    pub basic_details: Option<BasicDetails>,
    pub is_onboarded: bool,
}

/// Jobs of one organisation, resolved from its external identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgJobs {
    pub organisation: Organisation,
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnboardingStatus {
    pub is_onboarded: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

// ── DirectoryService trait ────────────────────────────────────

/// The single read interface the transport layer binds to.
///
/// All methods are side-effect-free and perform no retries; transient store
/// faults surface to the caller, who owns retry policy. Dropping a returned
/// future cancels lookups still in flight, so a dependent lookup is never
/// issued for a caller that has gone away.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    /// Resolve everything known about one user into a single view.
    async fn aggregate(&self, user: &UserRef) -> Result<AggregateView>;

    /// The user's organisation, if one exists.
    async fn organisation_for_user(&self, user: &UserRef) -> Result<Option<Organisation>>;

    /// Jobs of an organisation addressed by its external text identifier.
    /// Fails with `InvalidKeyFormat` before touching the store if the
    /// identifier does not parse; `None` if no such organisation exists.
    async fn jobs_for_org(&self, org_id: &str) -> Result<Option<OrgJobs>>;

    /// Applicants attached to a job's application document, by the job's
    /// external identifier.
    async fn applicants_for_job(&self, job_ref: &str) -> Result<Option<Vec<Applicant>>>;

    /// Whether the user has completed onboarding.
    async fn onboarding_status(&self, user: &UserRef) -> Result<OnboardingStatus>;
}

// ── DirectoryServiceImpl ──────────────────────────────────────

/// Concrete implementation over a document-store port.
pub struct DirectoryServiceImpl {
    store: Arc<dyn DocumentStore>,
}

impl DirectoryServiceImpl {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl DirectoryService for DirectoryServiceImpl {
    async fn aggregate(&self, user: &UserRef) -> Result<AggregateView> {
        let store = self.store.as_ref();

        // The chain and the per-user lookups have no ordering dependency on
        // each other; only jobs-after-organisation is sequenced (inside the
        // chain). No shared mutable state; results merge right here.
        let (chain, onboarding, basics, flags) = tokio::join!(
            resolve::resolve_org_chain(store, user),
            resolve::resolve_onboarding_config(store, user),
            resolve::resolve_basic_details(store, user),
            resolve::resolve_user_flags(store, user),
        );

        let (organisation_found, organisation, jobs) = match chain? {
            OrgChainOutcome::OrgNotFound => (false, None, Vec::new()),
            OrgChainOutcome::Resolved { organisation, jobs } => (true, Some(organisation), jobs),
        };
        let onboarding_config = onboarding?;
        let basic_details = basics?;
        let is_onboarded = flags?.map(|f| f.is_onboarded).unwrap_or(false);

        Ok(AggregateView {
            user_id: user.as_str().to_string(),
            organisation_found,
            organisation,
            jobs_count: jobs.len(),
            jobs,
            onboarding_config_found: onboarding_config.is_some(),
            onboarding_config,
            basic_details_found: basic_details.is_some(),
            basic_details,
            is_onboarded,
        })
    }

    async fn organisation_for_user(&self, user: &UserRef) -> Result<Option<Organisation>> {
        resolve::resolve_organisation(self.store.as_ref(), user).await
    }

    async fn jobs_for_org(&self, org_id: &str) -> Result<Option<OrgJobs>> {
        let org = NativeRef::parse("org_id", org_id)?;
        let store = self.store.as_ref();
        let Some(organisation) = resolve::resolve_organisation_by_id(store, org).await? else {
            return Ok(None);
        };
        let jobs = resolve::resolve_jobs(store, organisation.id).await?;
        Ok(Some(OrgJobs { organisation, jobs }))
    }

    async fn applicants_for_job(&self, job_ref: &str) -> Result<Option<Vec<Applicant>>> {
        resolve::resolve_applicants(self.store.as_ref(), job_ref).await
    }

    async fn onboarding_status(&self, user: &UserRef) -> Result<OnboardingStatus> {
        let flags = resolve::resolve_user_flags(self.store.as_ref(), user).await?;
        Ok(match flags {
            Some(f) => OnboardingStatus {
                is_onboarded: f.is_onboarded,
                completed_at: f.onboarding_completed_at,
            },
            None => OnboardingStatus {
                is_onboarded: false,
                completed_at: None,
            },
        })
    }
}
