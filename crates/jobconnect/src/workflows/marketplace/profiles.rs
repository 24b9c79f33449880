use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{
    Actor, Company, CompanyId, Education, JobSeekerId, JobSeekerProfile, JobType,
    NotificationKind, Project, RecruiterId, RecruiterProfile, SeekerStatus, UserRole,
};
use super::notifications::{Notifier, NotifyError};
use super::repository::{
    CompanyRepository, JobSeekerRepository, RecruiterRepository, RepositoryError,
};

static JOB_SEEKER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static COMPANY_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static RECRUITER_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_seeker_id() -> JobSeekerId {
    let id = JOB_SEEKER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobSeekerId(format!("jsk-{id:06}"))
}

fn next_company_id() -> CompanyId {
    let id = COMPANY_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CompanyId(format!("co-{id:06}"))
}

fn next_recruiter_id() -> RecruiterId {
    let id = RECRUITER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecruiterId(format!("rec-{id:06}"))
}

const RECRUITER_WELCOME: &str = "Welcome to JobConnect! Your recruiter profile has been created \
     successfully. You can now search for candidates based on your requirements.";

/// Fields a job seeker supplies at creation and on edit. Updates replace the
/// profile wholesale, matching the edit form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSeekerSubmission {
    pub name: String,
    #[serde(default)]
    pub education: Education,
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub languages: BTreeSet<String>,
    pub field_of_interest: String,
    #[serde(default)]
    pub work_experience: u32,
    pub min_salary: u32,
    pub job_type: JobType,
    pub current_status: SeekerStatus,
}

/// Company fields nested inside recruiter onboarding and edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanySubmission {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
}

/// Fields a recruiter supplies at onboarding and on edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruiterSubmission {
    pub company: CompanySubmission,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub experience_years: u32,
}

/// Dashboard view of whichever profile the actor owns. `None` from
/// [`ProfileService::profile_of`] is the route-to-profile-creation signal,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ProfileSummary {
    JobSeeker(JobSeekerProfile),
    Recruiter {
        profile: RecruiterProfile,
        company: Company,
    },
}

/// Profile intake and maintenance for both sides of the marketplace.
pub struct ProfileService {
    seekers: Arc<dyn JobSeekerRepository>,
    companies: Arc<dyn CompanyRepository>,
    recruiters: Arc<dyn RecruiterRepository>,
    notifier: Arc<Notifier>,
}

impl ProfileService {
    pub fn new(
        seekers: Arc<dyn JobSeekerRepository>,
        companies: Arc<dyn CompanyRepository>,
        recruiters: Arc<dyn RecruiterRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            seekers,
            companies,
            recruiters,
            notifier,
        }
    }

    /// Create the actor's job seeker profile. One profile per user account.
    pub fn create_job_seeker(
        &self,
        actor: &Actor,
        submission: JobSeekerSubmission,
    ) -> Result<JobSeekerProfile, ProfileError> {
        require_role(actor, UserRole::JobSeeker)?;

        if self.seekers.fetch_by_user(&actor.user_id)?.is_some() {
            return Err(RepositoryError::Conflict.into());
        }

        let profile = JobSeekerProfile {
            id: next_job_seeker_id(),
            user_id: actor.user_id.clone(),
            name: submission.name,
            education: submission.education,
            skills: submission.skills,
            projects: submission.projects,
            languages: submission.languages,
            field_of_interest: submission.field_of_interest,
            work_experience: submission.work_experience,
            min_salary: submission.min_salary,
            job_type: submission.job_type,
            current_status: submission.current_status,
        };

        Ok(self.seekers.insert(profile)?)
    }

    /// Replace the actor's job seeker profile with the submitted fields.
    pub fn update_job_seeker(
        &self,
        actor: &Actor,
        submission: JobSeekerSubmission,
    ) -> Result<JobSeekerProfile, ProfileError> {
        require_role(actor, UserRole::JobSeeker)?;

        let existing = self
            .seekers
            .fetch_by_user(&actor.user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let profile = JobSeekerProfile {
            id: existing.id,
            user_id: existing.user_id,
            name: submission.name,
            education: submission.education,
            skills: submission.skills,
            projects: submission.projects,
            languages: submission.languages,
            field_of_interest: submission.field_of_interest,
            work_experience: submission.work_experience,
            min_salary: submission.min_salary,
            job_type: submission.job_type,
            current_status: submission.current_status,
        };

        self.seekers.update(profile.clone())?;
        Ok(profile)
    }

    /// Recruiter onboarding as an explicit multi-step operation: company
    /// insert, recruiter insert, welcome notification. A failure at any
    /// later step compensates the earlier inserts so no partial onboarding
    /// survives.
    pub fn create_recruiter(
        &self,
        actor: &Actor,
        submission: RecruiterSubmission,
    ) -> Result<(RecruiterProfile, Company), ProfileError> {
        require_role(actor, UserRole::Recruiter)?;

        if self.recruiters.fetch_by_user(&actor.user_id)?.is_some() {
            return Err(RepositoryError::Conflict.into());
        }

        let company = self.companies.insert(Company {
            id: next_company_id(),
            name: submission.company.name,
            description: submission.company.description,
            website: submission.company.website,
        })?;

        let profile = RecruiterProfile {
            id: next_recruiter_id(),
            user_id: actor.user_id.clone(),
            company_id: company.id.clone(),
            name: submission.name,
            description: submission.description,
            experience_years: submission.experience_years,
            employees_hired: 0,
        };

        let recruiter = match self.recruiters.insert(profile) {
            Ok(recruiter) => recruiter,
            Err(err) => {
                // Compensate the committed company row.
                self.companies.delete(&company.id).ok();
                return Err(err.into());
            }
        };

        if let Err(err) = self.notifier.notify(
            &actor.user_id,
            NotificationKind::Welcome,
            RECRUITER_WELCOME.to_string(),
            None,
        ) {
            // Roll the whole onboarding back rather than leave it half done.
            self.recruiters.delete(&recruiter.id).ok();
            self.companies.delete(&company.id).ok();
            return Err(err.into());
        }

        Ok((recruiter, company))
    }

    /// Update the actor's recruiter profile and its company record.
    pub fn update_recruiter(
        &self,
        actor: &Actor,
        submission: RecruiterSubmission,
    ) -> Result<(RecruiterProfile, Company), ProfileError> {
        require_role(actor, UserRole::Recruiter)?;

        let existing = self
            .recruiters
            .fetch_by_user(&actor.user_id)?
            .ok_or(RepositoryError::NotFound)?;

        let company = Company {
            id: existing.company_id.clone(),
            name: submission.company.name,
            description: submission.company.description,
            website: submission.company.website,
        };
        self.companies.update(company.clone())?;

        let profile = RecruiterProfile {
            id: existing.id,
            user_id: existing.user_id,
            company_id: existing.company_id,
            name: submission.name,
            description: submission.description,
            experience_years: submission.experience_years,
            employees_hired: existing.employees_hired,
        };
        self.recruiters.update(profile.clone())?;

        Ok((profile, company))
    }

    /// Fetch whichever profile the actor owns. `Ok(None)` means the account
    /// has not completed profile creation yet.
    pub fn profile_of(&self, actor: &Actor) -> Result<Option<ProfileSummary>, ProfileError> {
        match actor.role {
            UserRole::JobSeeker => Ok(self
                .seekers
                .fetch_by_user(&actor.user_id)?
                .map(ProfileSummary::JobSeeker)),
            UserRole::Recruiter => {
                let Some(profile) = self.recruiters.fetch_by_user(&actor.user_id)? else {
                    return Ok(None);
                };
                let company = self
                    .companies
                    .fetch(&profile.company_id)?
                    .ok_or(RepositoryError::NotFound)?;
                Ok(Some(ProfileSummary::Recruiter { profile, company }))
            }
        }
    }
}

fn require_role(actor: &Actor, required: UserRole) -> Result<(), ProfileError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(ProfileError::RoleMismatch { required })
    }
}

/// Error raised by profile workflows.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("operation requires the {} role", required.label())]
    RoleMismatch { required: UserRole },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
