//! Receipt-scan quota model.
//!
//! Usage is counted per calendar month (UTC). [`QuotaInfo`] is a derived,
//! read-only view over the persisted counter and the user's plan.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

use crate::domain::Plan;

/// Monthly receipt scans allowed on the free plan.
pub const FREE_MONTHLY_RECEIPT_LIMIT: u32 = 10;

/// Calendar month over which receipt usage is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaPeriod {
    start: NaiveDate,
    resets_at: DateTime<Utc>,
}

impl QuotaPeriod {
    /// Period containing `now`.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::QuotaPeriod;
    /// use chrono::{NaiveDate, TimeZone, Utc};
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    /// let period = QuotaPeriod::containing(now);
    /// assert_eq!(period.start(), NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    /// assert_eq!(period.resets_at(), Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    /// ```
    pub fn containing(now: DateTime<Utc>) -> Self {
        let start = first_of_month(now.year(), now.month());
        let (next_year, next_month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        let next = first_of_month(next_year, next_month);
        let resets_at = Utc.from_utc_datetime(&next.and_time(chrono::NaiveTime::MIN));
        Self { start, resets_at }
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First instant of the following period.
    pub fn resets_at(&self) -> DateTime<Utc> {
        self.resets_at
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 exists for every month chrono can represent.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN)
}

/// Remaining receipt allowance for a user in the current period.
///
/// ## Invariants
/// - `limit` and `remaining` are both `None` (unlimited) or both `Some`.
/// - `remaining == limit.saturating_sub(used)` when bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaInfo {
    pub plan: Plan,
    pub limit: Option<u32>,
    pub used: u32,
    pub remaining: Option<u32>,
    pub period: QuotaPeriod,
}

impl QuotaInfo {
    /// Derive quota information from the plan and the period's counter.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Plan, QuotaInfo, QuotaPeriod};
    /// use chrono::Utc;
    ///
    /// let info = QuotaInfo::compute(Plan::Free, 12, QuotaPeriod::containing(Utc::now()));
    /// assert_eq!(info.remaining, Some(0));
    /// ```
    pub fn compute(plan: Plan, used: u32, period: QuotaPeriod) -> Self {
        let limit = monthly_limit(plan);
        Self {
            plan,
            limit,
            used,
            remaining: limit.map(|limit| limit.saturating_sub(used)),
            period,
        }
    }

    /// Whether another receipt may be scanned in this period.
    pub fn has_remaining(&self) -> bool {
        self.remaining.is_none_or(|remaining| remaining > 0)
    }
}

/// Receipt limit for a plan; `None` means unlimited.
pub const fn monthly_limit(plan: Plan) -> Option<u32> {
    match plan {
        Plan::Free => Some(FREE_MONTHLY_RECEIPT_LIMIT),
        Plan::Pro => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn june() -> QuotaPeriod {
        QuotaPeriod::containing(
            Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    #[rstest]
    #[case(0, Some(10))]
    #[case(3, Some(7))]
    #[case(10, Some(0))]
    #[case(42, Some(0))]
    fn free_plan_remaining_never_negative(#[case] used: u32, #[case] remaining: Option<u32>) {
        let info = QuotaInfo::compute(Plan::Free, used, june());
        assert_eq!(info.limit, Some(FREE_MONTHLY_RECEIPT_LIMIT));
        assert_eq!(info.remaining, remaining);
    }

    #[rstest]
    fn pro_plan_is_unlimited() {
        let info = QuotaInfo::compute(Plan::Pro, 500, june());
        assert_eq!(info.limit, None);
        assert_eq!(info.remaining, None);
        assert!(info.has_remaining());
    }

    #[rstest]
    fn exhausted_free_plan_has_no_remaining() {
        assert!(!QuotaInfo::compute(Plan::Free, 10, june()).has_remaining());
    }

    #[rstest]
    fn period_spans_calendar_month() {
        let period = june();
        assert_eq!(
            period.start(),
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
        );
        assert_eq!(
            period.resets_at(),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0)
                .single()
                .expect("valid timestamp")
        );
    }
}
