use std::sync::Arc;

use super::common::*;

use crate::workflows::marketplace::domain::{Actor, NotificationKind, SeekerStatus};
use crate::workflows::marketplace::notifications::Notifier;
use crate::workflows::marketplace::profiles::{ProfileError, ProfileService, ProfileSummary};
use crate::workflows::marketplace::repository::RepositoryError;

#[test]
fn job_seeker_creation_stores_the_profile_once() {
    let harness = harness();
    let actor = Actor::job_seeker("user-1");

    let profile = harness
        .profiles
        .create_job_seeker(&actor, seeker_submission("Rishi", &["Rust"]))
        .expect("first creation succeeds");
    assert_eq!(profile.user_id, actor.user_id);
    assert_eq!(profile.current_status, SeekerStatus::Seeking);

    let err = harness
        .profiles
        .create_job_seeker(&actor, seeker_submission("Rishi", &["Rust"]))
        .expect_err("second creation conflicts");
    assert!(matches!(
        err,
        ProfileError::Repository(RepositoryError::Conflict)
    ));
}

#[test]
fn recruiter_cannot_create_a_job_seeker_profile() {
    let harness = harness();
    let actor = Actor::recruiter("user-1");

    let err = harness
        .profiles
        .create_job_seeker(&actor, seeker_submission("Dana", &["Rust"]))
        .expect_err("role mismatch");
    assert!(matches!(err, ProfileError::RoleMismatch { .. }));
}

#[test]
fn job_seeker_update_replaces_fields_but_keeps_identity() {
    let harness = harness();
    let actor = Actor::job_seeker("user-1");
    let created = harness
        .profiles
        .create_job_seeker(&actor, seeker_submission("Rishi", &["Rust"]))
        .expect("created");

    let mut submission = seeker_submission("Rishi K", &["Rust", "SQL"]);
    submission.min_salary = 110_000;
    let updated = harness
        .profiles
        .update_job_seeker(&actor, submission)
        .expect("updated");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.user_id, created.user_id);
    assert_eq!(updated.name, "Rishi K");
    assert_eq!(updated.min_salary, 110_000);
}

#[test]
fn updating_a_missing_profile_is_not_found() {
    let harness = harness();
    let err = harness
        .profiles
        .update_job_seeker(
            &Actor::job_seeker("user-ghost"),
            seeker_submission("Ghost", &["Rust"]),
        )
        .expect_err("nothing to update");
    assert!(matches!(
        err,
        ProfileError::Repository(RepositoryError::NotFound)
    ));
}

#[test]
fn recruiter_onboarding_creates_company_profile_and_welcome() {
    let harness = harness();
    let actor = Actor::recruiter("user-1");

    let (profile, company) = harness
        .profiles
        .create_recruiter(&actor, recruiter_submission("Dana", "Initech"))
        .expect("onboarding succeeds");

    assert_eq!(profile.company_id, company.id);
    assert_eq!(profile.employees_hired, 0);
    assert_eq!(company.name, "Initech");

    let stored = harness.notifications.stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].kind, NotificationKind::Welcome);
    assert_eq!(stored[0].user_id, actor.user_id);
    assert!(!stored[0].read);
    assert_eq!(harness.publisher.published().len(), 1);
}

#[test]
fn failed_welcome_notification_rolls_back_the_onboarding() {
    let seekers = Arc::new(MemorySeekers::default());
    let companies = Arc::new(MemoryCompanies::default());
    let recruiters = Arc::new(MemoryRecruiters::default());
    let notifier = Arc::new(Notifier::new(
        Arc::new(UnavailableNotifications),
        Arc::new(MemoryPublisher::default()),
    ));
    let profiles = ProfileService::new(
        seekers,
        companies.clone(),
        recruiters.clone(),
        notifier,
    );

    let err = profiles
        .create_recruiter(
            &Actor::recruiter("user-1"),
            recruiter_submission("Dana", "Initech"),
        )
        .expect_err("notification store is down");
    assert!(matches!(err, ProfileError::Notify(_)));

    assert_eq!(companies.count(), 0);
    assert_eq!(recruiters.count(), 0);
}

#[test]
fn duplicate_recruiter_onboarding_conflicts_without_side_effects() {
    let harness = harness();
    let actor = Actor::recruiter("user-1");
    harness
        .profiles
        .create_recruiter(&actor, recruiter_submission("Dana", "Initech"))
        .expect("first onboarding succeeds");

    let err = harness
        .profiles
        .create_recruiter(&actor, recruiter_submission("Dana", "Initech"))
        .expect_err("second onboarding conflicts");
    assert!(matches!(
        err,
        ProfileError::Repository(RepositoryError::Conflict)
    ));

    assert_eq!(harness.companies.count(), 1);
    assert_eq!(harness.recruiters.count(), 1);
    assert_eq!(harness.notifications.stored().len(), 1);
}

#[test]
fn recruiter_update_touches_profile_and_company() {
    let harness = harness();
    let actor = Actor::recruiter("user-1");
    let (created, _) = harness
        .profiles
        .create_recruiter(&actor, recruiter_submission("Dana", "Initech"))
        .expect("onboarded");

    let mut submission = recruiter_submission("Dana W", "Initech Global");
    submission.experience_years = 9;
    let (profile, company) = harness
        .profiles
        .update_recruiter(&actor, submission)
        .expect("updated");

    assert_eq!(profile.id, created.id);
    assert_eq!(profile.name, "Dana W");
    assert_eq!(profile.experience_years, 9);
    assert_eq!(company.id, created.company_id);
    assert_eq!(company.name, "Initech Global");
}

#[test]
fn profile_of_signals_missing_profiles_with_none() {
    let harness = harness();
    let seeker = Actor::job_seeker("user-1");
    let recruiter = Actor::recruiter("user-2");

    assert!(harness
        .profiles
        .profile_of(&seeker)
        .expect("lookup runs")
        .is_none());

    harness
        .profiles
        .create_job_seeker(&seeker, seeker_submission("Rishi", &["Rust"]))
        .expect("created");
    harness
        .profiles
        .create_recruiter(&recruiter, recruiter_submission("Dana", "Initech"))
        .expect("onboarded");

    match harness.profiles.profile_of(&seeker).expect("lookup runs") {
        Some(ProfileSummary::JobSeeker(profile)) => assert_eq!(profile.name, "Rishi"),
        other => panic!("expected a job seeker summary, got {other:?}"),
    }
    match harness
        .profiles
        .profile_of(&recruiter)
        .expect("lookup runs")
    {
        Some(ProfileSummary::Recruiter { profile, company }) => {
            assert_eq!(profile.name, "Dana");
            assert_eq!(company.name, "Initech");
        }
        other => panic!("expected a recruiter summary, got {other:?}"),
    }
}
