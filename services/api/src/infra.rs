use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use jobconnect::workflows::marketplace::{
    CandidateFilter, CandidateSearch, Company, CompanyId, CompanyRepository, Invitation,
    InvitationId, InvitationRepository, InvitationService, JobSeekerId, JobSeekerProfile,
    JobSeekerRepository, MarketplaceState, MatchPolicy, Notification, NotificationHub,
    NotificationId, NotificationRepository, NotificationService, Notifier, ProfileService,
    RecruiterId, RecruiterProfile, RecruiterRepository, RepositoryError, SeekerStatus, UserId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Wire the in-memory stores into the full service bundle. The hub is
/// returned separately so callers can open push subscriptions.
pub(crate) fn marketplace_state() -> (MarketplaceState, Arc<NotificationHub>) {
    let seekers = Arc::new(InMemoryJobSeekers::default());
    let companies = Arc::new(InMemoryCompanies::default());
    let recruiters = Arc::new(InMemoryRecruiters::default());
    let invitations = Arc::new(InMemoryInvitations::default());
    let notifications = Arc::new(InMemoryNotifications::default());
    let hub = Arc::new(NotificationHub::new());

    let notifier = Arc::new(Notifier::new(notifications.clone(), hub.clone()));
    let state = MarketplaceState {
        profiles: Arc::new(ProfileService::new(
            seekers.clone(),
            companies.clone(),
            recruiters.clone(),
            notifier.clone(),
        )),
        search: Arc::new(CandidateSearch::new(seekers.clone(), MatchPolicy::default())),
        invitations: Arc::new(InvitationService::new(
            invitations,
            seekers,
            recruiters,
            companies,
            notifier,
        )),
        notifications: Arc::new(NotificationService::new(notifications)),
    };

    (state, hub)
}

// Row order is insertion order; the matcher and the notification feed both
// rely on a stable retrieval order.

#[derive(Default)]
pub(crate) struct InMemoryJobSeekers {
    rows: Mutex<Vec<JobSeekerProfile>>,
}

impl JobSeekerRepository for InMemoryJobSeekers {
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
pub(crate) struct InMemoryCompanies {
    rows: Mutex<Vec<Company>>,
}

impl CompanyRepository for InMemoryCompanies {
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
pub(crate) struct InMemoryRecruiters {
    rows: Mutex<Vec<RecruiterProfile>>,
}

impl RecruiterRepository for InMemoryRecruiters {
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
pub(crate) struct InMemoryInvitations {
    rows: Mutex<Vec<Invitation>>,
}

impl InvitationRepository for InMemoryInvitations {
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
pub(crate) struct InMemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl NotificationRepository for InMemoryNotifications {
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
