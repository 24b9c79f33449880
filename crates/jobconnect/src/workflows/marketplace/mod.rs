//! Two-sided recruitment marketplace: seeker and recruiter profiles,
//! skill-based candidate search, invitations, and notification delivery.

pub mod domain;
pub mod events;
pub mod invitations;
pub mod matching;
pub mod notifications;
pub mod profiles;
pub mod repository;
pub mod router;

#[cfg(test)]
mod tests;

pub use domain::{
    Actor, Company, CompanyId, Education, Invitation, InvitationId, InvitationReply,
    InvitationStatus, JobSeekerId, JobSeekerProfile, JobType, Notification, NotificationId,
    NotificationKind, Project, RecruiterId, RecruiterProfile, SeekerStatus, UserId, UserRole,
};
pub use events::{NotificationHub, NotificationPublisher, PublishError};
pub use invitations::{
    InvitationDashboard, InvitationDraft, InvitationError, InvitationService, InvitationStats,
    InvitationView,
};
pub use matching::{CandidateMatch, CandidateSearch, MatchPolicy, SearchCriteria, SearchError};
pub use notifications::{NotificationError, NotificationService, Notifier, NotifyError};
pub use profiles::{
    CompanySubmission, JobSeekerSubmission, ProfileError, ProfileService, ProfileSummary,
    RecruiterSubmission,
};
pub use repository::{
    CandidateFilter, CompanyRepository, InvitationRepository, JobSeekerRepository,
    NotificationRepository, RecruiterRepository, RepositoryError,
};
pub use router::{marketplace_router, MarketplaceState};
