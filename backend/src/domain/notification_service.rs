//! In-app notification use-cases.
//!
//! Writes are a single insert: no deduplication and no retry. A failed
//! insert surfaces to the caller as an internal error.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::ports::{
    NotificationQuery, NotificationRepository, NotificationRepositoryError, NotificationWriter,
};
use crate::domain::{Error, Notification, NotificationDraft, UserId};

/// Default page size for notification feeds.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 20;
/// Largest page a caller may request.
pub const MAX_NOTIFICATION_LIMIT: u32 = 100;

/// Notification service implementing both notification driving ports.
pub struct NotificationService<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> NotificationService<R> {
    /// Create a notification service over a repository and clock.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }
}

#[async_trait]
impl<R> NotificationWriter for NotificationService<R>
where
    R: NotificationRepository + ?Sized,
{
    async fn create_in_app_notification(
        &self,
        draft: NotificationDraft,
    ) -> Result<Notification, Error> {
        let notification = draft.into_notification(Uuid::new_v4(), self.clock.utc());
        self.repository
            .insert(&notification)
            .await
            .map_err(map_repository_error)?;
        info!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = notification.kind.as_str(),
            "in-app notification created"
        );
        Ok(notification)
    }
}

#[async_trait]
impl<R> NotificationQuery for NotificationService<R>
where
    R: NotificationRepository + ?Sized,
{
    async fn list_for_user(&self, user_id: &UserId, limit: u32) -> Result<Vec<Notification>, Error> {
        if !(1..=MAX_NOTIFICATION_LIMIT).contains(&limit) {
            return Err(Error::invalid_request(format!(
                "limit must be between 1 and {MAX_NOTIFICATION_LIMIT}"
            )));
        }
        self.repository
            .list_for_user(user_id, limit)
            .await
            .map_err(map_repository_error)
    }
}

fn map_repository_error(err: NotificationRepositoryError) -> Error {
    match err {
        NotificationRepositoryError::UnknownUser { .. } => {
            Error::not_found("notification recipient does not exist")
        }
        other => {
            error!(error = %other, "notification repository call failed");
            Error::internal(other.to_string())
        }
    }
}
