//! Port for reading persisted receipt-scan counters.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised by receipt usage repository adapters.
    pub enum ReceiptUsageRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "receipt usage repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "receipt usage repository query failed: {message}",
    }
}

/// Read-only access to monthly receipt counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReceiptUsageRepository: Send + Sync {
    /// Receipts counted for the period starting on `period_start`.
    ///
    /// Returns `None` when no receipt has been recorded in that period.
    async fn receipts_used(
        &self,
        user_id: &UserId,
        period_start: NaiveDate,
    ) -> Result<Option<u32>, ReceiptUsageRepositoryError>;
}
