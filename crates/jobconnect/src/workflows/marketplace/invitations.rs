use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::domain::{
    Actor, Invitation, InvitationId, InvitationReply, InvitationStatus, JobSeekerId,
    NotificationKind, StaleTransition, UserRole,
};
use super::notifications::{Notifier, NotifyError};
use super::repository::{
    CompanyRepository, InvitationRepository, JobSeekerRepository, RecruiterRepository,
    RepositoryError,
};

static INVITATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_invitation_id() -> InvitationId {
    let id = INVITATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InvitationId(format!("inv-{id:06}"))
}

/// Fields a recruiter supplies when inviting a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationDraft {
    pub job_seeker_id: JobSeekerId,
    pub role_title: String,
    pub required_skills: BTreeSet<String>,
    pub salary_range: String,
    #[serde(default)]
    pub message: String,
}

/// Display name of the other party, with the company for recruiter senders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CounterpartView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// One dashboard row: the invitation joined with its counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvitationView {
    pub invitation: Invitation,
    pub counterpart: CounterpartView,
}

/// Aggregate counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InvitationStats {
    pub total: usize,
    pub accepted: usize,
    pub declined: usize,
    pub pending: usize,
}

impl InvitationStats {
    pub fn tally<'a>(statuses: impl IntoIterator<Item = &'a InvitationStatus>) -> Self {
        let mut stats = Self::default();
        for status in statuses {
            stats.total += 1;
            match status {
                InvitationStatus::Accepted => stats.accepted += 1,
                InvitationStatus::Declined => stats.declined += 1,
                InvitationStatus::Pending => stats.pending += 1,
            }
        }
        stats
    }
}

/// Party-scoped invitation listing plus the aggregate counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvitationDashboard {
    pub stats: InvitationStats,
    pub invitations: Vec<InvitationView>,
}

/// Invitation workflow: creation by recruiters, the single pending ->
/// accepted/declined transition by the addressed job seeker, and the
/// party-scoped listings both dashboards read.
pub struct InvitationService {
    invitations: Arc<dyn InvitationRepository>,
    seekers: Arc<dyn JobSeekerRepository>,
    recruiters: Arc<dyn RecruiterRepository>,
    companies: Arc<dyn CompanyRepository>,
    notifier: Arc<Notifier>,
}

impl InvitationService {
    pub fn new(
        invitations: Arc<dyn InvitationRepository>,
        seekers: Arc<dyn JobSeekerRepository>,
        recruiters: Arc<dyn RecruiterRepository>,
        companies: Arc<dyn CompanyRepository>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            invitations,
            seekers,
            recruiters,
            companies,
            notifier,
        }
    }

    /// Create a pending invitation from the acting recruiter to an existing
    /// job seeker. Creation itself emits no notification; the record appears
    /// in the seeker's dashboard listing.
    pub fn create(
        &self,
        actor: &Actor,
        draft: InvitationDraft,
    ) -> Result<Invitation, InvitationError> {
        require_role(actor, UserRole::Recruiter)?;

        let recruiter = self
            .recruiters
            .fetch_by_user(&actor.user_id)?
            .ok_or(RepositoryError::NotFound)?;

        // Invitations must always reference an existing profile.
        let seeker = self
            .seekers
            .fetch(&draft.job_seeker_id)?
            .ok_or(RepositoryError::NotFound)?;

        let invitation = Invitation {
            id: next_invitation_id(),
            recruiter_id: recruiter.id,
            job_seeker_id: seeker.id,
            role_title: draft.role_title,
            required_skills: draft.required_skills,
            salary_range: draft.salary_range,
            message: draft.message,
            status: InvitationStatus::Pending,
            created_at: Utc::now(),
        };

        Ok(self.invitations.insert(invitation)?)
    }

    /// Apply the addressed job seeker's reply and notify the recruiter.
    ///
    /// The status write and the notification form one operation: when the
    /// notification cannot be stored, the status write is compensated back
    /// to pending and the error surfaces, so an accepted/declined invitation
    /// without its notification never remains committed. The compensation is
    /// best-effort: if the revert itself fails, the inconsistency is logged
    /// and the notification error still wins.
    pub fn respond(
        &self,
        actor: &Actor,
        id: &InvitationId,
        reply: InvitationReply,
    ) -> Result<Invitation, InvitationError> {
        require_role(actor, UserRole::JobSeeker)?;

        let mut invitation = self
            .invitations
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let seeker = self
            .seekers
            .fetch(&invitation.job_seeker_id)?
            .ok_or(RepositoryError::NotFound)?;
        if seeker.user_id != actor.user_id {
            return Err(InvitationError::Forbidden);
        }

        // Resolve the recruiter before mutating anything so a missing
        // counterpart cannot strand a half-finished transition.
        let recruiter = self
            .recruiters
            .fetch(&invitation.recruiter_id)?
            .ok_or(RepositoryError::NotFound)?;

        invitation.respond(reply)?;
        self.invitations.update(invitation.clone())?;

        let message = format!(
            "{} has {} your invitation for the role of {}.",
            seeker.name,
            invitation.status.label(),
            invitation.role_title
        );
        if let Err(err) = self.notifier.notify(
            &recruiter.user_id,
            NotificationKind::InvitationResponse,
            message,
            Some(invitation.id.0.clone()),
        ) {
            let mut reverted = invitation.clone();
            reverted.status = InvitationStatus::Pending;
            if let Err(revert_err) = self.invitations.update(reverted) {
                tracing::warn!(
                    invitation_id = %invitation.id.0,
                    error = %revert_err,
                    "failed to revert invitation status after notification failure"
                );
            }
            return Err(err.into());
        }

        Ok(invitation)
    }

    /// The actor's side of the invitation ledger, joined with counterpart
    /// display names and tallied by status.
    pub fn dashboard(&self, actor: &Actor) -> Result<InvitationDashboard, InvitationError> {
        let invitations = match actor.role {
            UserRole::Recruiter => {
                let recruiter = self
                    .recruiters
                    .fetch_by_user(&actor.user_id)?
                    .ok_or(RepositoryError::NotFound)?;
                let sent = self.invitations.sent_by(&recruiter.id)?;
                sent.into_iter()
                    .map(|invitation| {
                        let seeker = self
                            .seekers
                            .fetch(&invitation.job_seeker_id)?
                            .ok_or(RepositoryError::NotFound)?;
                        Ok(InvitationView {
                            invitation,
                            counterpart: CounterpartView {
                                name: seeker.name,
                                company: None,
                            },
                        })
                    })
                    .collect::<Result<Vec<_>, InvitationError>>()?
            }
            UserRole::JobSeeker => {
                let seeker = self
                    .seekers
                    .fetch_by_user(&actor.user_id)?
                    .ok_or(RepositoryError::NotFound)?;
                let received = self.invitations.received_by(&seeker.id)?;
                received
                    .into_iter()
                    .map(|invitation| {
                        let recruiter = self
                            .recruiters
                            .fetch(&invitation.recruiter_id)?
                            .ok_or(RepositoryError::NotFound)?;
                        let company = self
                            .companies
                            .fetch(&recruiter.company_id)?
                            .ok_or(RepositoryError::NotFound)?;
                        Ok(InvitationView {
                            invitation,
                            counterpart: CounterpartView {
                                name: recruiter.name,
                                company: Some(company.name),
                            },
                        })
                    })
                    .collect::<Result<Vec<_>, InvitationError>>()?
            }
        };

        let stats = InvitationStats::tally(invitations.iter().map(|view| &view.invitation.status));
        Ok(InvitationDashboard { stats, invitations })
    }
}

fn require_role(actor: &Actor, required: UserRole) -> Result<(), InvitationError> {
    if actor.role == required {
        Ok(())
    } else {
        Err(InvitationError::RoleMismatch { required })
    }
}

/// Error raised by the invitation workflow.
#[derive(Debug, thiserror::Error)]
pub enum InvitationError {
    #[error("operation requires the {} role", required.label())]
    RoleMismatch { required: UserRole },
    #[error("invitation is addressed to another job seeker")]
    Forbidden,
    #[error(transparent)]
    Stale(#[from] StaleTransition),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
