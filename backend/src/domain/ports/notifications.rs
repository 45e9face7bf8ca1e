//! Driving ports for in-app notifications.

use async_trait::async_trait;

use crate::domain::{Error, Notification, NotificationDraft, UserId};

/// Writes notifications on behalf of other use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationWriter: Send + Sync {
    /// Persist a single notification; no dedup, no retry.
    async fn create_in_app_notification(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, Error>;
}

/// Reads a user's notification feed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationQuery: Send + Sync {
    /// Newest-first notifications for the user, at most `limit` entries.
    async fn list_for_user(&self, user_id: &UserId, limit: u32) -> Result<Vec<Notification>, Error>;
}
