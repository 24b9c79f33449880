use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;

use super::domain::{Notification, UserId};

/// Outbound push seam for notification delivery. Implementations fan a
/// stored notification out to whatever transport the owner is watching.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError>;
}

/// Delivery channel failure.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("notification channel unavailable: {0}")]
    Transport(String),
}

const CHANNEL_CAPACITY: usize = 64;

/// In-process event channel: one broadcast sender per user id. Subscribers
/// observe notifications in publication order; publishing to a user with no
/// live subscriber is a non-error (the row is already persisted and shows up
/// on the next dashboard load).
#[derive(Default)]
pub struct NotificationHub {
    channels: Mutex<HashMap<UserId, broadcast::Sender<Notification>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a push subscription for one user. Events published after this
    /// call are observed at least once, in order.
    pub fn subscribe(&self, user_id: &UserId) -> broadcast::Receiver<Notification> {
        let mut channels = self.channels.lock().expect("hub mutex poisoned");
        channels
            .entry(user_id.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

impl NotificationPublisher for NotificationHub {
    fn publish(&self, notification: &Notification) -> Result<(), PublishError> {
        let channels = self.channels.lock().expect("hub mutex poisoned");
        if let Some(sender) = channels.get(&notification.user_id) {
            // send() only errors when every receiver is gone; that is the
            // same as having no subscription at all.
            let _ = sender.send(notification.clone());
        }
        Ok(())
    }
}
