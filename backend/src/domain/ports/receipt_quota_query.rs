//! Driving port exposing a user's receipt-scan allowance.

use async_trait::async_trait;

use crate::domain::{Error, QuotaInfo, UserId};

/// Read-only quota use-case; safe to call repeatedly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptQuotaQuery: Send + Sync {
    /// Current-period quota summary for the user.
    async fn receipt_quota(&self, user_id: &UserId) -> Result<QuotaInfo, Error>;
}
