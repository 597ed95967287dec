use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::monthly_reports::MonthlyReportEntity;
use crate::domain::errors::PayoutResult;
use crate::domain::value_objects::reconciliation::CreatorPayoutTotals;
use crate::domain::value_objects::reports::UnlockActor;

#[async_trait]
#[automock]
pub trait MonthlyReportRepository {
    /// Generates the report for `(creator_id, period)` as one transaction:
    /// sums the creator's period accruals, inserts the report, credits the
    /// locked balance, and zeroes the summed videos' period counters.
    /// Returns `None` when the creator earned nothing this period; fails
    /// with `AlreadyProcessed` when the report already exists (unique
    /// constraint on creator and period).
    async fn generate_for_creator(
        &self,
        creator_id: Uuid,
        period: &str,
        locked_until: DateTime<Utc>,
    ) -> PayoutResult<Option<MonthlyReportEntity>>;

    async fn find_by_id(&self, report_id: Uuid) -> PayoutResult<MonthlyReportEntity>;

    async fn list_due_for_unlock(
        &self,
        now: DateTime<Utc>,
    ) -> PayoutResult<Vec<MonthlyReportEntity>>;

    /// Moves the report's payout from locked to available and marks it
    /// unlocked, as one transaction keyed by the report row. Fails with
    /// `AlreadyProcessed` when the report is no longer locked, and with
    /// `StillLocked` when an operator unlocks before `locked_until`.
    async fn unlock(
        &self,
        report_id: Uuid,
        actor: UnlockActor,
    ) -> PayoutResult<MonthlyReportEntity>;

    /// Recomputed per-creator payout sums, for the consistency sweep.
    async fn payout_totals(&self) -> PayoutResult<Vec<CreatorPayoutTotals>>;
}
