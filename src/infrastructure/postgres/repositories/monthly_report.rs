use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::monthly_reports::{InsertMonthlyReportEntity, MonthlyReportEntity};
use crate::domain::entities::video_accruals::VideoAccrualEntity;
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::monthly_report::MonthlyReportRepository;
use crate::domain::value_objects::enums::audit_actions::AuditAction;
use crate::domain::value_objects::enums::report_statuses::ReportStatus;
use crate::domain::value_objects::reconciliation::CreatorPayoutTotals;
use crate::domain::value_objects::reports::{UnlockActor, summarize_period};
use crate::infrastructure::postgres::{
    get_conn, ledger_tx,
    postgres_connection::PgPoolSquad,
    schema::{monthly_reports, video_accruals},
};

pub struct MonthlyReportPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MonthlyReportPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MonthlyReportRepository for MonthlyReportPostgres {
    async fn generate_for_creator(
        &self,
        creator_id: Uuid,
        period: &str,
        locked_until: DateTime<Utc>,
    ) -> PayoutResult<Option<MonthlyReportEntity>> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<Option<MonthlyReportEntity>, PayoutError, _>(|conn| {
            // Locking the accrual rows keeps the feed from posting into a
            // counter between the sum and the reset below.
            let accruals: Vec<VideoAccrualEntity> = video_accruals::table
                .filter(video_accruals::creator_id.eq(creator_id))
                .select(VideoAccrualEntity::as_select())
                .order(video_accruals::video_id.asc())
                .for_update()
                .load(conn)?;

            let summary = summarize_period(&accruals);
            if summary.is_empty() {
                return Ok(None);
            }

            let insert_entity = InsertMonthlyReportEntity {
                id: Uuid::new_v4(),
                creator_id,
                period: period.to_string(),
                payout_minor: summary.payout_minor,
                status: ReportStatus::Locked.to_string(),
                locked_until,
                video_breakdown: serde_json::to_value(&summary.breakdown)
                    .map_err(|err| PayoutError::Internal(err.into()))?,
            };

            // The unique constraint on (creator_id, period) is the
            // idempotency guard; a duplicate insert surfaces as
            // AlreadyProcessed and the whole transaction rolls back.
            let report = diesel::insert_into(monthly_reports::table)
                .values(&insert_entity)
                .returning(MonthlyReportEntity::as_returning())
                .get_result::<MonthlyReportEntity>(conn)?;

            ledger_tx::apply_balance_op(
                conn,
                creator_id,
                AuditAction::CreditLocked,
                "system",
                |balances| balances.credit_locked(summary.payout_minor),
            )?;

            diesel::update(
                video_accruals::table
                    .filter(video_accruals::video_id.eq_any(summary.summed_video_ids())),
            )
            .set((
                video_accruals::period_views.eq(0),
                video_accruals::period_premium_views.eq(0),
                video_accruals::period_earnings_minor.eq(0),
                video_accruals::updated_at.eq(Utc::now()),
            ))
            .execute(conn)?;

            Ok(Some(report))
        })
    }

    async fn find_by_id(&self, report_id: Uuid) -> PayoutResult<MonthlyReportEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let report = monthly_reports::table
            .find(report_id)
            .select(MonthlyReportEntity::as_select())
            .first::<MonthlyReportEntity>(&mut conn)?;

        Ok(report)
    }

    async fn list_due_for_unlock(
        &self,
        now: DateTime<Utc>,
    ) -> PayoutResult<Vec<MonthlyReportEntity>> {
        let mut conn = get_conn(&self.db_pool)?;

        let due = monthly_reports::table
            .filter(monthly_reports::status.eq(ReportStatus::Locked.as_str()))
            .filter(monthly_reports::locked_until.le(now))
            .select(MonthlyReportEntity::as_select())
            .order(monthly_reports::locked_until.asc())
            .load::<MonthlyReportEntity>(&mut conn)?;

        Ok(due)
    }

    async fn unlock(
        &self,
        report_id: Uuid,
        actor: UnlockActor,
    ) -> PayoutResult<MonthlyReportEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<MonthlyReportEntity, PayoutError, _>(|conn| {
            let report: MonthlyReportEntity = monthly_reports::table
                .find(report_id)
                .select(MonthlyReportEntity::as_select())
                .for_update()
                .first(conn)?;

            // A concurrent sweep or operator already moved the money; the
            // status re-check under the row lock is what makes a double
            // unlock impossible.
            if report.status != ReportStatus::Locked.as_str() {
                return Err(PayoutError::AlreadyProcessed);
            }

            let now = Utc::now();
            if actor.is_operator() && report.locked_until > now {
                return Err(PayoutError::StillLocked(report.locked_until));
            }

            ledger_tx::apply_balance_op(
                conn,
                report.creator_id,
                AuditAction::UnlockToAvailable,
                &actor.audit_actor(),
                |balances| balances.unlock_to_available(report.payout_minor),
            )?;

            let updated = diesel::update(monthly_reports::table.find(report_id))
                .set((
                    monthly_reports::status.eq(ReportStatus::Unlocked.as_str()),
                    monthly_reports::unlocked_at.eq(Some(now)),
                    monthly_reports::unlocked_by.eq(Some(actor.audit_actor())),
                ))
                .returning(MonthlyReportEntity::as_returning())
                .get_result::<MonthlyReportEntity>(conn)?;

            Ok(updated)
        })
    }

    async fn payout_totals(&self) -> PayoutResult<Vec<CreatorPayoutTotals>> {
        let mut conn = get_conn(&self.db_pool)?;

        let rows: Vec<(Uuid, i64, String)> = monthly_reports::table
            .select((
                monthly_reports::creator_id,
                monthly_reports::payout_minor,
                monthly_reports::status,
            ))
            .load(&mut conn)?;

        let mut totals: HashMap<Uuid, CreatorPayoutTotals> = HashMap::new();
        for (creator_id, payout_minor, status) in rows {
            let entry = totals.entry(creator_id).or_insert(CreatorPayoutTotals {
                creator_id,
                reported_minor: 0,
                unlocked_minor: 0,
            });
            entry.reported_minor += payout_minor;
            if status == ReportStatus::Unlocked.as_str() {
                entry.unlocked_minor += payout_minor;
            }
        }

        Ok(totals.into_values().collect())
    }
}
