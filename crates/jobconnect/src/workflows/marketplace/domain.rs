use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity issued by the authentication collaborator. Profiles, invitations,
/// and notifications all hang off one of these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for job seeker profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobSeekerId(pub String);

/// Identifier wrapper for companies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Identifier wrapper for recruiter profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecruiterId(pub String);

/// Identifier wrapper for invitations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(pub String);

/// Identifier wrapper for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

/// Which side of the marketplace a user signed up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    JobSeeker,
    Recruiter,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::JobSeeker => "jobseeker",
            UserRole::Recruiter => "recruiter",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jobseeker" => Some(UserRole::JobSeeker),
            "recruiter" => Some(UserRole::Recruiter),
            _ => None,
        }
    }
}

/// Explicit request context threaded into every workflow call. There is no
/// ambient current-user state anywhere in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    pub fn job_seeker(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: UserRole::JobSeeker,
        }
    }

    pub fn recruiter(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            role: UserRole::Recruiter,
        }
    }
}

/// Availability declared on a job seeker profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekerStatus {
    Seeking,
    Working,
    Idle,
}

impl SeekerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SeekerStatus::Seeking => "seeking",
            SeekerStatus::Working => "working",
            SeekerStatus::Idle => "idle",
        }
    }
}

/// Employment arrangements a candidate will consider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    FullTime,
    PartTime,
    Remote,
    Internship,
}

impl JobType {
    pub const fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
        }
    }
}

/// Academic background captured at profile creation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Education {
    pub university: String,
    pub degree: String,
    pub branch: String,
    pub year_of_passing: Option<u16>,
    pub cgpa: Option<String>,
}

/// Portfolio entry on a job seeker profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub links: Vec<String>,
    pub duration: String,
}

/// One side of the marketplace: a candidate profile visible to recruiters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerProfile {
    pub id: JobSeekerId,
    pub user_id: UserId,
    pub name: String,
    pub education: Education,
    pub skills: BTreeSet<String>,
    pub projects: Vec<Project>,
    pub languages: BTreeSet<String>,
    pub field_of_interest: String,
    pub work_experience: u32,
    pub min_salary: u32,
    pub job_type: JobType,
    pub current_status: SeekerStatus,
}

/// Employer record owned collectively by its recruiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    pub website: String,
}

/// The other side of the marketplace: a recruiter attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterProfile {
    pub id: RecruiterId,
    pub user_id: UserId,
    pub company_id: CompanyId,
    pub name: String,
    pub description: String,
    pub experience_years: u32,
    pub employees_hired: u32,
}

/// Lifecycle of an invitation. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

/// The job seeker's answer to a pending invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationReply {
    Accepted,
    Declined,
}

impl InvitationReply {
    pub const fn as_status(self) -> InvitationStatus {
        match self {
            InvitationReply::Accepted => InvitationStatus::Accepted,
            InvitationReply::Declined => InvitationStatus::Declined,
        }
    }
}

/// Raised when a transition is attempted on an already resolved invitation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invitation already resolved as {}", current.label())]
pub struct StaleTransition {
    pub current: InvitationStatus,
}

/// Recruiter-initiated offer tracked through pending/accepted/declined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: InvitationId,
    pub recruiter_id: RecruiterId,
    pub job_seeker_id: JobSeekerId,
    pub role_title: String,
    pub required_skills: BTreeSet<String>,
    pub salary_range: String,
    pub message: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Apply the job seeker's reply. Only `pending -> accepted` and
    /// `pending -> declined` exist; resolved invitations never reopen.
    pub fn respond(&mut self, reply: InvitationReply) -> Result<(), StaleTransition> {
        if self.status.is_terminal() {
            return Err(StaleTransition {
                current: self.status,
            });
        }
        self.status = reply.as_status();
        Ok(())
    }
}

/// Category tag carried on every notification row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Welcome,
    InvitationResponse,
}

impl NotificationKind {
    pub const fn label(self) -> &'static str {
        match self {
            NotificationKind::Welcome => "welcome",
            NotificationKind::InvitationResponse => "invitation_response",
        }
    }
}

/// Message addressed to a single user; only the owner may mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub related_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
