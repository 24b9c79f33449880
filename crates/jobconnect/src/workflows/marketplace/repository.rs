use super::domain::{
    Company, CompanyId, Invitation, InvitationId, JobSeekerId, JobSeekerProfile, Notification,
    NotificationId, RecruiterId, RecruiterProfile, UserId,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Coarse pre-filter pushed down to the store before skill scoring happens
/// locally. Both salary bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateFilter {
    pub min_experience: u32,
    pub salary_min: u32,
    pub salary_max: u32,
}

impl CandidateFilter {
    pub fn admits(&self, profile: &JobSeekerProfile) -> bool {
        profile.work_experience >= self.min_experience
            && profile.min_salary >= self.salary_min
            && profile.min_salary <= self.salary_max
    }
}

/// Storage abstraction for candidate profiles.
///
/// `seeking_candidates` must return only `seeking` profiles admitted by the
/// filter, in a stable retrieval order; the matcher relies on that order to
/// break score ties.
pub trait JobSeekerRepository: Send + Sync {
    fn insert(&self, profile: JobSeekerProfile) -> Result<JobSeekerProfile, RepositoryError>;
    fn update(&self, profile: JobSeekerProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &JobSeekerId) -> Result<Option<JobSeekerProfile>, RepositoryError>;
    fn fetch_by_user(&self, user_id: &UserId)
        -> Result<Option<JobSeekerProfile>, RepositoryError>;
    fn seeking_candidates(
        &self,
        filter: &CandidateFilter,
    ) -> Result<Vec<JobSeekerProfile>, RepositoryError>;
}

/// Storage abstraction for companies. `delete` backs the compensating step
/// of the recruiter onboarding saga.
pub trait CompanyRepository: Send + Sync {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError>;
    fn update(&self, company: Company) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CompanyId) -> Result<Option<Company>, RepositoryError>;
    fn delete(&self, id: &CompanyId) -> Result<(), RepositoryError>;
}

/// Storage abstraction for recruiter profiles.
pub trait RecruiterRepository: Send + Sync {
    fn insert(&self, profile: RecruiterProfile) -> Result<RecruiterProfile, RepositoryError>;
    fn update(&self, profile: RecruiterProfile) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &RecruiterId) -> Result<Option<RecruiterProfile>, RepositoryError>;
    fn fetch_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<RecruiterProfile>, RepositoryError>;
    fn delete(&self, id: &RecruiterId) -> Result<(), RepositoryError>;
}

/// Storage abstraction for invitations. Listing is party-scoped: recruiters
/// see what they sent, job seekers what they received.
pub trait InvitationRepository: Send + Sync {
    fn insert(&self, invitation: Invitation) -> Result<Invitation, RepositoryError>;
    fn update(&self, invitation: Invitation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &InvitationId) -> Result<Option<Invitation>, RepositoryError>;
    fn sent_by(&self, recruiter_id: &RecruiterId) -> Result<Vec<Invitation>, RepositoryError>;
    fn received_by(&self, job_seeker_id: &JobSeekerId)
        -> Result<Vec<Invitation>, RepositoryError>;
}

/// Storage abstraction for notifications.
pub trait NotificationRepository: Send + Sync {
    fn insert(&self, notification: Notification) -> Result<Notification, RepositoryError>;
    fn update(&self, notification: Notification) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &NotificationId) -> Result<Option<Notification>, RepositoryError>;
    /// Newest first, at most `limit` rows.
    fn recent_for(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<Notification>, RepositoryError>;
    /// Flip every unread row owned by `user_id`; returns how many changed.
    fn mark_all_read(&self, user_id: &UserId) -> Result<usize, RepositoryError>;
    fn delete(&self, id: &NotificationId) -> Result<(), RepositoryError>;
}
