//! Chain resolution — user → organisation → jobs, plus the one-hop
//! per-user lookups.
//!
//! Each hop filters with the representation the target field actually
//! stores: the organisation's ownership field holds the user's opaque text
//! reference, while the jobs join field holds the organisation's native
//! reference. The [`FilterValue`] variants keep the two from being mixed.
//! Store faults abort a chain at its current link; "not found" and "no
//! jobs" are ordinary terminal outcomes, not faults.

use serde_json::Value;
use tracing::{error, warn};

use crate::keys::{NativeRef, UserRef};
use crate::ports::{DocumentStore, FilterValue, Result};
use crate::types::{
    Applicant, BasicDetails, Collection, Job, OnboardingConfig, Organisation, UserFlags,
};

/// Field the onboarding writer stores the owning user reference under.
pub const ORG_OWNER_FIELD: &str = "created_by_user_id";
/// Join field on job documents holding the organisation's native reference.
pub const JOB_ORG_FIELD: &str = "org_id";
/// Key field for the per-user collections.
pub const USER_KEY_FIELD: &str = "user_id";
/// Store-native primary identifier field.
pub const ID_FIELD: &str = "_id";
/// External job identifier field on job_applications documents.
pub const APPLICATION_JOB_FIELD: &str = "job_id";

/// Outcome of the organisation → jobs chain.
#[derive(Debug, Clone, PartialEq)]
pub enum OrgChainOutcome {
    /// Terminal: no organisation exists for this user. Distinct from an
    /// organisation that has no jobs yet.
    OrgNotFound,
    /// The chain completed. `jobs` may be empty, a valid terminal state.
    Resolved {
        organisation: Organisation,
        jobs: Vec<Job>,
    },
}

/// Look up the user's organisation by ownership field.
///
/// The store does not enforce uniqueness of the ownership field; a second
/// match is logged and the earliest record wins, deterministically.
pub async fn resolve_organisation(
    store: &dyn DocumentStore,
    user: &UserRef,
) -> Result<Option<Organisation>> {
    let filter = FilterValue::Text(user.as_str().to_string());
    let matches = store
        .find_many(Collection::Organisations, ORG_OWNER_FIELD, &filter)
        .await?;
    if matches.len() > 1 {
        warn!(
            user = %user,
            count = matches.len(),
            "multiple organisations for one user; keeping the earliest"
        );
    }
    match matches.into_iter().next() {
        Some(doc) => Organisation::from_document(doc).map(Some),
        None => Ok(None),
    }
}

/// Look up an organisation by its native reference.
pub async fn resolve_organisation_by_id(
    store: &dyn DocumentStore,
    org: NativeRef,
) -> Result<Option<Organisation>> {
    match store
        .find_one(Collection::Organisations, ID_FIELD, &FilterValue::Ref(org))
        .await?
    {
        Some(doc) => Organisation::from_document(doc).map(Some),
        None => Ok(None),
    }
}

/// Resolve all jobs joined to an organisation.
///
/// The join value goes through in native form; stringifying it here is
/// exactly the representation mismatch this layer exists to prevent. A
/// matched job document that does not decode is excluded and logged; the
/// rest of the result set survives.
pub async fn resolve_jobs(store: &dyn DocumentStore, org: NativeRef) -> Result<Vec<Job>> {
    let filter = FilterValue::Ref(org);
    let docs = store
        .find_many(Collection::Jobs, JOB_ORG_FIELD, &filter)
        .await?;
    let mut jobs = Vec::with_capacity(docs.len());
    for doc in docs {
        match Job::from_document(doc) {
            Ok(job) => jobs.push(job),
            Err(err) => {
                error!(org = %org, %err, "excluding undecodable job document");
            }
        }
    }
    Ok(jobs)
}

/// Run the user → organisation → jobs chain. The jobs lookup does not start
/// until the organisation lookup has completed; its key comes from that
/// result.
pub async fn resolve_org_chain(
    store: &dyn DocumentStore,
    user: &UserRef,
) -> Result<OrgChainOutcome> {
    let Some(organisation) = resolve_organisation(store, user).await? else {
        return Ok(OrgChainOutcome::OrgNotFound);
    };
    let jobs = resolve_jobs(store, organisation.id).await?;
    Ok(OrgChainOutcome::Resolved {
        organisation,
        jobs,
    })
}

pub async fn resolve_onboarding_config(
    store: &dyn DocumentStore,
    user: &UserRef,
) -> Result<Option<OnboardingConfig>> {
    let filter = FilterValue::Text(user.as_str().to_string());
    match store
        .find_one(Collection::OnboardingConfig, USER_KEY_FIELD, &filter)
        .await?
    {
        Some(doc) => OnboardingConfig::from_document(doc).map(Some),
        None => Ok(None),
    }
}

pub async fn resolve_basic_details(
    store: &dyn DocumentStore,
    user: &UserRef,
) -> Result<Option<BasicDetails>> {
    let filter = FilterValue::Text(user.as_str().to_string());
    match store
        .find_one(Collection::BasicDetails, USER_KEY_FIELD, &filter)
        .await?
    {
        Some(doc) => BasicDetails::from_document(doc).map(Some),
        None => Ok(None),
    }
}

pub async fn resolve_user_flags(
    store: &dyn DocumentStore,
    user: &UserRef,
) -> Result<Option<UserFlags>> {
    let filter = FilterValue::Text(user.as_str().to_string());
    match store
        .find_one(Collection::Users, USER_KEY_FIELD, &filter)
        .await?
    {
        Some(doc) => UserFlags::from_document(doc).map(Some),
        None => Ok(None),
    }
}

/// Resolve the applicants embedded in a job's application document, keyed by
/// the job's external identifier. `None` means no application document
/// exists for the job; `Some(vec![])` means one exists with no applicants.
pub async fn resolve_applicants(
    store: &dyn DocumentStore,
    job_ref: &str,
) -> Result<Option<Vec<Applicant>>> {
    let filter = FilterValue::Text(job_ref.to_string());
    let Some(doc) = store
        .find_one(Collection::JobApplications, APPLICATION_JOB_FIELD, &filter)
        .await?
    else {
        return Ok(None);
    };
    let entries = doc
        .get("applicants")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut applicants = Vec::with_capacity(entries.len());
    for entry in &entries {
        match Applicant::from_document(entry) {
            Ok(applicant) => applicants.push(applicant),
            Err(err) => {
                error!(job = job_ref, %err, "excluding undecodable applicant entry");
            }
        }
    }
    Ok(Some(applicants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Document;
    use async_trait::async_trait;
    use serde_json::json;
    use uuid::Uuid;

    /// Minimal in-crate test double; the full-featured store lives in
    /// hire_os_harness.
    struct StubStore {
        docs: Vec<(Collection, Document)>,
    }

    #[async_trait]
    impl DocumentStore for StubStore {
        async fn find_one(
            &self,
            collection: Collection,
            field: &str,
            value: &FilterValue,
        ) -> Result<Option<Document>> {
            Ok(self.matches(collection, field, value).into_iter().next())
        }

        async fn find_many(
            &self,
            collection: Collection,
            field: &str,
            value: &FilterValue,
        ) -> Result<Vec<Document>> {
            Ok(self.matches(collection, field, value))
        }
    }

    impl StubStore {
        fn matches(&self, collection: Collection, field: &str, value: &FilterValue) -> Vec<Document> {
            let wanted = value.as_json();
            self.docs
                .iter()
                .filter(|(c, d)| *c == collection && d.get(field) == Some(&wanted))
                .map(|(_, d)| d.clone())
                .collect()
        }
    }

    fn org_doc(id: Uuid, user: &str, name: &str) -> Document {
        json!({
            "_id": id.to_string(),
            "created_by_user_id": user,
            "company_name": name,
            "created_at": "2025-01-05T10:00:00Z",
        })
    }

    #[tokio::test]
    async fn chain_reports_org_not_found() {
        let store = StubStore { docs: vec![] };
        let user = UserRef::new("u2").unwrap();
        let outcome = resolve_org_chain(&store, &user).await.unwrap();
        assert_eq!(outcome, OrgChainOutcome::OrgNotFound);
    }

    #[tokio::test]
    async fn chain_resolves_jobs_by_native_reference() {
        let org_id = Uuid::new_v4();
        let other_org = Uuid::new_v4();
        let store = StubStore {
            docs: vec![
                (Collection::Organisations, org_doc(org_id, "u1", "Acme")),
                (
                    Collection::Jobs,
                    json!({
                        "_id": Uuid::new_v4().to_string(),
                        "org_id": org_id.to_string(),
                        "job_title": "Engineer",
                        "created_at": "2025-01-06T10:00:00Z",
                    }),
                ),
                (
                    Collection::Jobs,
                    json!({
                        "_id": Uuid::new_v4().to_string(),
                        "org_id": other_org.to_string(),
                        "job_title": "Excluded",
                        "created_at": "2025-01-06T10:00:00Z",
                    }),
                ),
            ],
        };
        let user = UserRef::new("u1").unwrap();
        let outcome = resolve_org_chain(&store, &user).await.unwrap();
        let OrgChainOutcome::Resolved { organisation, jobs } = outcome else {
            panic!("expected resolved chain");
        };
        assert_eq!(organisation.name, "Acme");
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Engineer");
        assert_eq!(jobs[0].org_id, organisation.id);
    }

    #[tokio::test]
    async fn duplicate_organisations_pick_the_first_deterministically() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let store = StubStore {
            docs: vec![
                (Collection::Organisations, org_doc(first, "u1", "First")),
                (Collection::Organisations, org_doc(second, "u1", "Second")),
            ],
        };
        let user = UserRef::new("u1").unwrap();
        for _ in 0..3 {
            let org = resolve_organisation(&store, &user).await.unwrap().unwrap();
            assert_eq!(org.name, "First");
        }
    }

    #[tokio::test]
    async fn undecodable_job_is_excluded_not_fatal() {
        let org_id = Uuid::new_v4();
        let store = StubStore {
            docs: vec![
                (Collection::Organisations, org_doc(org_id, "u1", "Acme")),
                (
                    Collection::Jobs,
                    json!({
                        "_id": "not-a-native-reference",
                        "org_id": org_id.to_string(),
                        "job_title": "Broken",
                        "created_at": "2025-01-06T10:00:00Z",
                    }),
                ),
                (
                    Collection::Jobs,
                    json!({
                        "_id": Uuid::new_v4().to_string(),
                        "org_id": org_id.to_string(),
                        "job_title": "Good",
                        "created_at": "2025-01-06T10:00:00Z",
                    }),
                ),
            ],
        };
        let jobs = resolve_jobs(&store, NativeRef::new(org_id)).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Good");
    }
}
