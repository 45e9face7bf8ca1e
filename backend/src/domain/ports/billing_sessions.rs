//! Driving port for billing session use-cases.

use async_trait::async_trait;
use url::Url;

use crate::domain::{Error, UserId};

/// Hosted billing flows available to an authenticated user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingSessions: Send + Sync {
    /// URL of the provider-hosted subscription management page.
    async fn create_portal_session(&self, user_id: &UserId) -> Result<Url, Error>;

    /// URL of the provider-hosted subscription checkout page.
    async fn create_checkout_session(&self, user_id: &UserId) -> Result<Url, Error>;
}
