use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::domain::{Actor, Notification, NotificationId, NotificationKind, UserId};
use super::events::{NotificationPublisher, PublishError};
use super::repository::{NotificationRepository, RepositoryError};

/// How many rows the initial dashboard load shows.
pub const RECENT_LIMIT: usize = 20;

static NOTIFICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_notification_id() -> NotificationId {
    let id = NOTIFICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    NotificationId(format!("ntf-{id:06}"))
}

/// Couples record insertion with push publication so every stored
/// notification also reaches the owner's live subscription.
pub struct Notifier {
    repository: Arc<dyn NotificationRepository>,
    publisher: Arc<dyn NotificationPublisher>,
}

impl Notifier {
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Persist a notification (unread) and push it to the owner's channel.
    pub fn notify(
        &self,
        user_id: &UserId,
        kind: NotificationKind,
        message: String,
        related_id: Option<String>,
    ) -> Result<Notification, NotifyError> {
        let notification = Notification {
            id: next_notification_id(),
            user_id: user_id.clone(),
            message,
            kind,
            read: false,
            related_id,
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(notification)?;
        self.publisher.publish(&stored)?;
        Ok(stored)
    }
}

/// Error raised while fanning out a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Owner-facing notification operations. Every mutation verifies the actor
/// owns the row; no other party may touch it.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// The most recent notifications for the actor, newest first.
    pub fn recent(&self, actor: &Actor) -> Result<Vec<Notification>, NotificationError> {
        Ok(self.repository.recent_for(&actor.user_id, RECENT_LIMIT)?)
    }

    /// Mark one notification read. Already-read rows are left untouched.
    pub fn mark_read(
        &self,
        actor: &Actor,
        id: &NotificationId,
    ) -> Result<Notification, NotificationError> {
        let mut notification = self.owned(actor, id)?;
        if !notification.read {
            notification.read = true;
            self.repository.update(notification.clone())?;
        }
        Ok(notification)
    }

    /// Mark every unread notification read; returns how many changed.
    pub fn mark_all_read(&self, actor: &Actor) -> Result<usize, NotificationError> {
        Ok(self.repository.mark_all_read(&actor.user_id)?)
    }

    /// Remove one notification owned by the actor.
    pub fn delete(&self, actor: &Actor, id: &NotificationId) -> Result<(), NotificationError> {
        let notification = self.owned(actor, id)?;
        self.repository.delete(&notification.id)?;
        Ok(())
    }

    fn owned(&self, actor: &Actor, id: &NotificationId) -> Result<Notification, NotificationError> {
        let notification = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        if notification.user_id != actor.user_id {
            return Err(NotificationError::Forbidden);
        }
        Ok(notification)
    }
}

/// Error raised by owner-facing notification operations.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification belongs to another user")]
    Forbidden,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
