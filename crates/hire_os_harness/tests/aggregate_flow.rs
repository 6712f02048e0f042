//! Aggregate-view scenarios through the `DirectoryService` boundary.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use hire_os_core::types::Collection;
use hire_os_core::{DirectoryService, DirectoryServiceImpl, UserRef};
use hire_os_harness::{init_tracing, MemDocumentStore};

fn setup() -> (Arc<MemDocumentStore>, DirectoryServiceImpl) {
    init_tracing();
    let store = Arc::new(MemDocumentStore::new());
    let service = DirectoryServiceImpl::new(store.clone());
    (store, service)
}

fn org_doc(id: Uuid, user: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id.to_string(),
        "created_by_user_id": user,
        "company_name": name,
        "industry": "Software",
    })
}

fn job_doc(id: Uuid, org: Uuid, title: &str) -> serde_json::Value {
    json!({
        "_id": id.to_string(),
        "org_id": org.to_string(),
        "job_title": title,
        "company": "Acme",
        "status": "open",
    })
}

#[tokio::test]
async fn aggregate_resolves_the_full_chain() {
    let (store, service) = setup();
    let org = Uuid::new_v4();
    let job = Uuid::new_v4();
    store.insert(Collection::Organisations, org_doc(org, "u1", "Acme"));
    store.insert(Collection::Jobs, job_doc(job, org, "Engineer"));

    let user = UserRef::new("u1").unwrap();
    let view = service.aggregate(&user).await.unwrap();

    assert!(view.organisation_found);
    assert_eq!(view.organisation.as_ref().unwrap().name, "Acme");
    assert_eq!(view.jobs_count, 1);
    assert_eq!(view.jobs[0].title, "Engineer");

    // Native references cross the boundary in their canonical text form.
    let value = serde_json::to_value(&view).unwrap();
    assert_eq!(value["organisation"]["_id"], org.to_string());
    assert_eq!(value["jobs"][0]["_id"], job.to_string());
    assert_eq!(value["jobs"][0]["org_id"], org.to_string());
}

#[tokio::test]
async fn aggregate_without_organisation_is_flagged_not_raised() {
    let (store, service) = setup();
    // Another user's records must not bleed into u2's view.
    let org = Uuid::new_v4();
    store.insert(Collection::Organisations, org_doc(org, "u1", "Acme"));
    store.insert(Collection::Jobs, job_doc(Uuid::new_v4(), org, "Engineer"));

    let user = UserRef::new("u2").unwrap();
    let view = service.aggregate(&user).await.unwrap();

    assert!(!view.organisation_found);
    assert!(view.organisation.is_none());
    assert!(view.jobs.is_empty());
    assert_eq!(view.jobs_count, 0);
    assert!(!view.onboarding_config_found);
    assert!(!view.basic_details_found);
    assert!(!view.is_onboarded);
}

#[tokio::test]
async fn organisation_with_no_jobs_is_a_valid_terminal_state() {
    let (store, service) = setup();
    store.insert(
        Collection::Organisations,
        org_doc(Uuid::new_v4(), "u1", "Acme"),
    );

    let user = UserRef::new("u1").unwrap();
    let view = service.aggregate(&user).await.unwrap();

    assert!(view.organisation_found);
    assert!(view.jobs.is_empty());
}

#[tokio::test]
async fn orphaned_jobs_never_surface() {
    let (store, service) = setup();
    let org = Uuid::new_v4();
    store.insert(Collection::Organisations, org_doc(org, "u1", "Acme"));
    store.insert(Collection::Jobs, job_doc(Uuid::new_v4(), org, "Engineer"));
    // Points at no organisation at all: excluded everywhere, never an error.
    store.insert(
        Collection::Jobs,
        job_doc(Uuid::new_v4(), Uuid::new_v4(), "Orphan"),
    );

    let user = UserRef::new("u1").unwrap();
    let view = service.aggregate(&user).await.unwrap();
    assert_eq!(view.jobs_count, 1);
    assert_eq!(view.jobs[0].title, "Engineer");
}

#[tokio::test]
async fn duplicate_organisations_resolve_to_the_earliest() {
    let (store, service) = setup();
    let newer = Uuid::new_v4();
    let older = Uuid::new_v4();
    let mut newer_doc = org_doc(newer, "u1", "Newer");
    newer_doc["created_at"] = json!("2025-02-01T00:00:00Z");
    let mut older_doc = org_doc(older, "u1", "Older");
    older_doc["created_at"] = json!("2025-01-01T00:00:00Z");
    // Inserted newest-first: creation order must win, not insertion order.
    store.insert(Collection::Organisations, newer_doc);
    store.insert(Collection::Organisations, older_doc);

    let user = UserRef::new("u1").unwrap();
    let first = service.aggregate(&user).await.unwrap();
    for _ in 0..3 {
        let again = service.aggregate(&user).await.unwrap();
        assert_eq!(again, first);
    }
    assert_eq!(first.organisation.as_ref().unwrap().name, "Older");
}

#[tokio::test]
async fn aggregate_is_byte_identical_on_unchanged_data() {
    let (store, service) = setup();
    let org = Uuid::new_v4();
    store.insert(Collection::Organisations, org_doc(org, "u1", "Acme"));
    store.insert(Collection::Jobs, job_doc(Uuid::new_v4(), org, "Engineer"));
    store.insert(
        Collection::BasicDetails,
        json!({
            "user_id": "u1",
            "full_name": "Jane Doe",
            "timestamp": "2025-01-07T09:00:00Z",
        }),
    );

    let user = UserRef::new("u1").unwrap();
    let first = serde_json::to_string(&service.aggregate(&user).await.unwrap()).unwrap();
    let second = serde_json::to_string(&service.aggregate(&user).await.unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn onboarding_sections_fold_into_the_view() {
    let (store, service) = setup();
    store.insert(
        Collection::OnboardingConfig,
        json!({
            "user_id": "u1",
            "automation": { "auto_shortlist": true },
            "calendar_integration": "google",
            "email_integration": "gmail",
            "ats_selected": "none",
            "timestamp": "2025-01-07T09:00:00Z",
        }),
    );
    store.insert(
        Collection::BasicDetails,
        json!({
            "user_id": "u1",
            "full_name": "Jane Doe",
            "email": "jane@acme.test",
            "location": "Berlin",
            "onboarding_complete": true,
            "timestamp": "2025-01-07T09:00:00Z",
        }),
    );
    store.insert(
        Collection::Users,
        json!({
            "user_id": "u1",
            "is_onboarded": true,
            "onboarding_completed_at": "2025-01-07T09:05:00Z",
        }),
    );

    let user = UserRef::new("u1").unwrap();
    let view = service.aggregate(&user).await.unwrap();

    assert!(view.onboarding_config_found);
    let config = view.onboarding_config.as_ref().unwrap();
    assert_eq!(config.calendar_integration.as_deref(), Some("google"));
    assert_eq!(config.created_at.to_rfc3339(), "2025-01-07T09:00:00+00:00");

    assert!(view.basic_details_found);
    assert_eq!(view.basic_details.as_ref().unwrap().full_name, "Jane Doe");
    assert!(view.is_onboarded);
}

#[tokio::test]
async fn undecodable_job_is_excluded_from_the_aggregate() {
    let (store, service) = setup();
    let org = Uuid::new_v4();
    store.insert(Collection::Organisations, org_doc(org, "u1", "Acme"));
    store.insert(Collection::Jobs, job_doc(Uuid::new_v4(), org, "Good"));
    store.insert(
        Collection::Jobs,
        json!({
            "_id": "not-a-native-reference",
            "org_id": org.to_string(),
            "job_title": "Broken",
        }),
    );

    let user = UserRef::new("u1").unwrap();
    let view = service.aggregate(&user).await.unwrap();
    assert_eq!(view.jobs_count, 1);
    assert_eq!(view.jobs[0].title, "Good");
}
