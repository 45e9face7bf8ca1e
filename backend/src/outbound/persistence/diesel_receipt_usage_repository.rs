//! PostgreSQL-backed `ReceiptUsageRepository`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{ReceiptUsageRepository, ReceiptUsageRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ReceiptUsageRow;
use super::pool::{DbPool, PoolError};
use super::schema::receipt_usage;

/// Diesel-backed reader for monthly receipt counters.
#[derive(Clone)]
pub struct DieselReceiptUsageRepository {
    pool: DbPool,
}

impl DieselReceiptUsageRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReceiptUsageRepositoryError {
    map_basic_pool_error(error, ReceiptUsageRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ReceiptUsageRepositoryError {
    map_basic_diesel_error(
        error,
        ReceiptUsageRepositoryError::query,
        ReceiptUsageRepositoryError::connection,
    )
}

fn row_to_count(row: ReceiptUsageRow) -> Result<u32, ReceiptUsageRepositoryError> {
    u32::try_from(row.receipts_used)
        .map_err(|_| ReceiptUsageRepositoryError::query("negative receipt counter"))
}

#[async_trait]
impl ReceiptUsageRepository for DieselReceiptUsageRepository {
    async fn receipts_used(
        &self,
        user_id: &UserId,
        period_start: NaiveDate,
    ) -> Result<Option<u32>, ReceiptUsageRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ReceiptUsageRow> = receipt_usage::table
            .filter(receipt_usage::user_id.eq(user_id.as_uuid()))
            .filter(receipt_usage::period_start.eq(period_start))
            .select(ReceiptUsageRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_count).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn counter_converts_to_unsigned() {
        let count = row_to_count(ReceiptUsageRow { receipts_used: 7 }).expect("valid count");
        assert_eq!(count, 7);
    }

    #[rstest]
    fn negative_counter_is_a_query_error() {
        let err = row_to_count(ReceiptUsageRow { receipts_used: -1 }).expect_err("invalid count");
        assert!(matches!(err, ReceiptUsageRepositoryError::Query { .. }));
    }
}
