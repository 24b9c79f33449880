use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::marketplace::domain::{
    Actor, Company, CompanyId, Invitation, InvitationId, JobSeekerId, JobSeekerProfile, JobType,
    Notification, NotificationId, RecruiterId, RecruiterProfile, SeekerStatus, UserId,
};
use crate::workflows::marketplace::events::{NotificationPublisher, PublishError};
use crate::workflows::marketplace::matching::{CandidateSearch, MatchPolicy, SearchCriteria};
use crate::workflows::marketplace::notifications::{NotificationService, Notifier};
use crate::workflows::marketplace::profiles::{
    CompanySubmission, JobSeekerSubmission, ProfileService, RecruiterSubmission,
};
use crate::workflows::marketplace::repository::{
    CandidateFilter, CompanyRepository, InvitationRepository, JobSeekerRepository,
    NotificationRepository, RecruiterRepository, RepositoryError,
};
use crate::workflows::marketplace::InvitationService;

pub(super) fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
}

pub(super) fn seeker_submission(name: &str, skill_names: &[&str]) -> JobSeekerSubmission {
    JobSeekerSubmission {
        name: name.to_string(),
        education: Default::default(),
        skills: skills(skill_names),
        projects: Vec::new(),
        languages: skills(&["English"]),
        field_of_interest: "Backend".to_string(),
        work_experience: 3,
        min_salary: 90_000,
        job_type: JobType::FullTime,
        current_status: SeekerStatus::Seeking,
    }
}

pub(super) fn recruiter_submission(name: &str, company: &str) -> RecruiterSubmission {
    RecruiterSubmission {
        company: CompanySubmission {
            name: company.to_string(),
            description: "Ships software".to_string(),
            website: "https://example.com".to_string(),
        },
        name: name.to_string(),
        description: "Technical recruiter".to_string(),
        experience_years: 4,
    }
}

pub(super) fn seeker_profile(suffix: &str, skill_names: &[&str]) -> JobSeekerProfile {
    JobSeekerProfile {
        id: JobSeekerId(format!("jsk-{suffix}")),
        user_id: UserId(format!("user-{suffix}")),
        name: format!("Seeker {suffix}"),
        education: Default::default(),
        skills: skills(skill_names),
        projects: Vec::new(),
        languages: skills(&["English"]),
        field_of_interest: "Backend".to_string(),
        work_experience: 3,
        min_salary: 90_000,
        job_type: JobType::FullTime,
        current_status: SeekerStatus::Seeking,
    }
}

pub(super) fn criteria(skill_names: &[&str]) -> SearchCriteria {
    SearchCriteria {
        required_skills: skills(skill_names),
        min_experience: 0,
        salary_min: 50_000,
        salary_max: 120_000,
        project_required: false,
        language: None,
        job_type: None,
    }
}

#[derive(Default)]
pub(super) struct MemorySeekers {
    rows: Mutex<Vec<JobSeekerProfile>>,
}

impl JobSeekerRepository for MemorySeekers {
    fn insert(&self, profile: JobSeekerProfile) -> Result<JobSeekerProfile, RepositoryError> {
        let mut rows = self.rows.lock().expect("seeker mutex poisoned");
        if rows
            .iter()
            .any(|row| row.id == profile.id || row.user_id == profile.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        rows.push(profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: JobSeekerProfile) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("seeker mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == profile.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = profile;
        Ok(())
    }

    fn fetch(&self, id: &JobSeekerId) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let rows = self.rows.lock().expect("seeker mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn fetch_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<JobSeekerProfile>, RepositoryError> {
        let rows = self.rows.lock().expect("seeker mutex poisoned");
        Ok(rows.iter().find(|row| &row.user_id == user_id).cloned())
    }

    fn seeking_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<JobSeekerProfile>, RepositoryError> {
        let rows = self.rows.lock().expect("seeker mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| row.current_status == SeekerStatus::Seeking && filter.admits(row))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryCompanies {
    rows: Mutex<Vec<Company>>,
}

impl MemoryCompanies {
    pub(super) fn count(&self) -> usize {
        self.rows.lock().expect("company mutex poisoned").len()
    }
}

impl CompanyRepository for MemoryCompanies {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut rows = self.rows.lock().expect("company mutex poisoned");
        if rows.iter().any(|row| row.id == company.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(company.clone());
        Ok(company)
    }

    fn update(&self, company: Company) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("company mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == company.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = company;
        Ok(())
    }

    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError> {
        let rows = self.rows.lock().expect("company mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn delete(&self, id: &CompanyId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("company mutex poisoned");
        rows.retain(|row| &row.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryRecruiters {
    rows: Mutex<Vec<RecruiterProfile>>,
}

impl MemoryRecruiters {
    pub(super) fn count(&self) -> usize {
        self.rows.lock().expect("recruiter mutex poisoned").len()
    }
}

impl RecruiterRepository for MemoryRecruiters {
    fn insert(&self, profile: RecruiterProfile) -> Result<RecruiterProfile, RepositoryError> {
        let mut rows = self.rows.lock().expect("recruiter mutex poisoned");
        if rows
            .iter()
            .any(|row| row.id == profile.id || row.user_id == profile.user_id)
        {
            return Err(RepositoryError::Conflict);
        }
        rows.push(profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: RecruiterProfile) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("recruiter mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == profile.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = profile;
        Ok(())
    }

    fn fetch(&self, id: &RecruiterId) -> Result<Option<RecruiterProfile>, RepositoryError> {
        let rows = self.rows.lock().expect("recruiter mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn fetch_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<RecruiterProfile>, RepositoryError> {
        let rows = self.rows.lock().expect("recruiter mutex poisoned");
        Ok(rows.iter().find(|row| &row.user_id == user_id).cloned())
    }

    fn delete(&self, id: &RecruiterId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("recruiter mutex poisoned");
        rows.retain(|row| &row.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryInvitations {
    rows: Mutex<Vec<Invitation>>,
}

impl InvitationRepository for MemoryInvitations {
    fn insert(&self, invitation: Invitation) -> Result<Invitation, RepositoryError> {
        let mut rows = self.rows.lock().expect("invitation mutex poisoned");
        if rows.iter().any(|row| row.id == invitation.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(invitation.clone());
        Ok(invitation)
    }

    fn update(&self, invitation: Invitation) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("invitation mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == invitation.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = invitation;
        Ok(())
    }

    fn fetch(&self, id: &InvitationId) -> Result<Option<Invitation>, RepositoryError> {
        let rows = self.rows.lock().expect("invitation mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn sent_by(&self, recruiter_id: &RecruiterId) -> Result<Vec<Invitation>, RepositoryError> {
        let rows = self.rows.lock().expect("invitation mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.recruiter_id == recruiter_id)
            .cloned()
            .collect())
    }

    fn received_by(
        &self,
        job_seeker_id: &JobSeekerId,
    ) -> Result<Vec<Invitation>, RepositoryError> {
        let rows = self.rows.lock().expect("invitation mutex poisoned");
        Ok(rows
            .iter()
            .filter(|row| &row.job_seeker_id == job_seeker_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl MemoryNotifications {
    pub(super) fn stored(&self) -> Vec<Notification> {
        self.rows.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationRepository for MemoryNotifications {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError> {
        let mut rows = self.rows.lock().expect("notification mutex poisoned");
        if rows.iter().any(|row| row.id == notification.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.push(notification.clone());
        Ok(notification)
    }

    fn update(&self, notification: Notification) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("notification mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row.id == notification.id)
            .ok_or(RepositoryError::NotFound)?;
        *row = notification;
        Ok(())
    }

    fn fetch(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError> {
        let rows = self.rows.lock().expect("notification mutex poisoned");
        Ok(rows.iter().find(|row| &row.id == id).cloned())
    }

    fn recent_for(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepositoryError> {
        let rows = self.rows.lock().expect("notification mutex poisoned");
        Ok(rows
            .iter()
            .rev()
            .filter(|row| &row.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }

    fn mark_all_read(&self, user_id: &UserId) -> Result<usize, RepositoryError> {
        let mut rows = self.rows.lock().expect("notification mutex poisoned");
        let mut changed = 0;
        for row in rows.iter_mut() {
            if &row.user_id == user_id && !row.read {
                row.read = true;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("notification mutex poisoned");
        let before = rows.len();
        rows.retain(|row| &row.id != id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryPublisher {
    events: Mutex<Vec<Notification>>,
}

impl MemoryPublisher {
    pub(super) fn published(&self) -> Vec<Notification> {
        self.events.lock().expect("publisher mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryPublisher {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
        self.events
            .lock()
            .expect("publisher mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct FailingPublisher;

impl NotificationPublisher for FailingPublisher {
    fn publish(&self, _notification: &Notification) -> Result<(), PublishError> {
        Err(PublishError::Transport("push gateway offline".to_string()))
    }
}

pub(super) struct UnavailableNotifications;

impl NotificationRepository for UnavailableNotifications {
    fn insert(&self, _notification: Notification) -> Result<Notification, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn update(&self, _notification: Notification) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn fetch(&self, _id: &NotificationId) -> Result<Option<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn recent_for(
        &self,
        _user_id: &UserId,
        _limit: usize,
    ) -> Result<Vec<Notification>, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn mark_all_read(&self, _user_id: &UserId) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }

    fn delete(&self, _id: &NotificationId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("maintenance".to_string()))
    }
}

/// Everything a workflow test needs: the shared stores plus the services
/// wired over them.
pub(super) struct Harness {
    pub(super) seekers: Arc<MemorySeekers>,
    pub(super) companies: Arc<MemoryCompanies>,
    pub(super) recruiters: Arc<MemoryRecruiters>,
    pub(super) invitations: Arc<MemoryInvitations>,
    pub(super) notifications: Arc<MemoryNotifications>,
    pub(super) publisher: Arc<MemoryPublisher>,
    pub(super) profiles: Arc<ProfileService>,
    pub(super) search: Arc<CandidateSearch>,
    pub(super) invitation_service: Arc<InvitationService>,
    pub(super) notification_service: Arc<NotificationService>,
}

pub(super) fn harness() -> Harness {
    harness_with_publisher(Arc::new(MemoryPublisher::default()))
}

pub(super) fn harness_with_publisher(publisher: Arc<MemoryPublisher>) -> Harness {
    let seekers = Arc::new(MemorySeekers::default());
    let companies = Arc::new(MemoryCompanies::default());
    let recruiters = Arc::new(MemoryRecruiters::default());
    let invitations = Arc::new(MemoryInvitations::default());
    let notifications = Arc::new(MemoryNotifications::default());

    let notifier = Arc::new(Notifier::new(notifications.clone(), publisher.clone()));
    let profiles = Arc::new(ProfileService::new(
        seekers.clone(),
        companies.clone(),
        recruiters.clone(),
        notifier.clone(),
    ));
    let search = Arc::new(CandidateSearch::new(
        seekers.clone(),
        MatchPolicy::default(),
    ));
    let invitation_service = Arc::new(InvitationService::new(
        invitations.clone(),
        seekers.clone(),
        recruiters.clone(),
        companies.clone(),
        notifier,
    ));
    let notification_service = Arc::new(NotificationService::new(notifications.clone()));

    Harness {
        seekers,
        companies,
        recruiters,
        invitations,
        notifications,
        publisher,
        profiles,
        search,
        invitation_service,
        notification_service,
    }
}

pub(super) fn marketplace_router_with(harness: &Harness) -> axum::Router {
    crate::workflows::marketplace::router::marketplace_router(
        crate::workflows::marketplace::router::MarketplaceState {
            profiles: harness.profiles.clone(),
            search: harness.search.clone(),
            invitations: harness.invitation_service.clone(),
            notifications: harness.notification_service.clone(),
        },
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Onboard one recruiter and one seeker and send a pending invitation,
/// returning the two actors and the invitation id.
pub(super) fn onboarded_pair(harness: &Harness) -> (Actor, Actor, InvitationId) {
    let recruiter = Actor::recruiter("user-rec");
    let seeker = Actor::job_seeker("user-seek");

    harness
        .profiles
        .create_recruiter(&recruiter, recruiter_submission("Dana", "Initech"))
        .expect("recruiter onboarding succeeds");
    let profile = harness
        .profiles
        .create_job_seeker(&seeker, seeker_submission("Rishi", &["Rust", "SQL"]))
        .expect("seeker profile created");

    let invitation = harness
        .invitation_service
        .create(
            &recruiter,
            crate::workflows::marketplace::invitations::InvitationDraft {
                job_seeker_id: profile.id,
                role_title: "Backend Engineer".to_string(),
                required_skills: skills(&["Rust"]),
                salary_range: "$90,000 - $120,000".to_string(),
                message: "We would love to talk.".to_string(),
            },
        )
        .expect("invitation created");

    (recruiter, seeker, invitation.id)
}
