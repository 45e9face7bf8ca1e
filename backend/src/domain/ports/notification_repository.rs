//! Port for notification persistence.
//!
//! Inserts are single best-effort writes; adapters must not deduplicate.

use async_trait::async_trait;

use crate::domain::{Notification, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "notification repository connection failed: {message}",
        /// Query or insert failed during execution.
        Query { message: String } =>
            "notification repository query failed: {message}",
        /// The recipient does not exist.
        UnknownUser { user_id: String } =>
            "notification recipient {user_id} does not exist",
    }
}

/// Storage for in-app notifications.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Persist a new notification.
    async fn insert(&self, notification: &Notification) -> Result<(), NotificationRepositoryError>;

    /// Most recent notifications for a user, newest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Notification>, NotificationRepositoryError>;
}
