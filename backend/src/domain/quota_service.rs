//! Receipt quota use-case.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::error;

use crate::domain::billing::map_user_error;
use crate::domain::ports::{
    ReceiptQuotaQuery, ReceiptUsageRepository, ReceiptUsageRepositoryError, UserRepository,
};
use crate::domain::{Error, QuotaInfo, QuotaPeriod, UserId};

/// Computes quota summaries from the user's plan and the current month's
/// usage counter. Reads only; no counter is ever created here.
pub struct ReceiptQuotaService<U: ?Sized, R: ?Sized> {
    users: Arc<U>,
    usage: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<U: ?Sized, R: ?Sized> ReceiptQuotaService<U, R> {
    /// Create a quota service reading "now" from `clock`.
    pub fn new(users: Arc<U>, usage: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            usage,
            clock,
        }
    }
}

#[async_trait]
impl<U, R> ReceiptQuotaQuery for ReceiptQuotaService<U, R>
where
    U: UserRepository + ?Sized,
    R: ReceiptUsageRepository + ?Sized,
{
    async fn receipt_quota(&self, user_id: &UserId) -> Result<QuotaInfo, Error> {
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let period = QuotaPeriod::containing(self.clock.utc());
        let used = self
            .usage
            .receipts_used(user_id, period.start())
            .await
            .map_err(map_usage_error)?
            .unwrap_or(0);

        Ok(QuotaInfo::compute(user.plan(), used, period))
    }
}

fn map_usage_error(err: ReceiptUsageRepositoryError) -> Error {
    error!(error = %err, "receipt usage lookup failed");
    Error::internal(err.to_string())
}
