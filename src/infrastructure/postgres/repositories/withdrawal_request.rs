use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::withdrawal_requests::{
    InsertWithdrawalRequestEntity, WithdrawalRequestEntity,
};
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::withdrawal_request::WithdrawalRequestRepository;
use crate::domain::value_objects::enums::audit_actions::AuditAction;
use crate::domain::value_objects::enums::withdrawal_statuses::WithdrawalStatus;
use crate::domain::value_objects::reconciliation::CreatorApprovedTotals;
use crate::infrastructure::postgres::{
    get_conn, ledger_tx, postgres_connection::PgPoolSquad, schema::withdrawal_requests,
};

pub struct WithdrawalRequestPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl WithdrawalRequestPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn lock_pending(
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let request: WithdrawalRequestEntity = withdrawal_requests::table
            .find(request_id)
            .select(WithdrawalRequestEntity::as_select())
            .for_update()
            .first(conn)?;

        if request.status != WithdrawalStatus::Pending.as_str() {
            return Err(PayoutError::AlreadyProcessed);
        }

        Ok(request)
    }
}

#[async_trait]
impl WithdrawalRequestRepository for WithdrawalRequestPostgres {
    async fn create(
        &self,
        entity: InsertWithdrawalRequestEntity,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let request = diesel::insert_into(withdrawal_requests::table)
            .values(&entity)
            .returning(WithdrawalRequestEntity::as_returning())
            .get_result::<WithdrawalRequestEntity>(&mut conn)?;

        Ok(request)
    }

    async fn find_by_id(&self, request_id: Uuid) -> PayoutResult<WithdrawalRequestEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let request = withdrawal_requests::table
            .find(request_id)
            .select(WithdrawalRequestEntity::as_select())
            .first::<WithdrawalRequestEntity>(&mut conn)?;

        Ok(request)
    }

    async fn list_pending(&self) -> PayoutResult<Vec<WithdrawalRequestEntity>> {
        let mut conn = get_conn(&self.db_pool)?;

        let pending = withdrawal_requests::table
            .filter(withdrawal_requests::status.eq(WithdrawalStatus::Pending.as_str()))
            .select(WithdrawalRequestEntity::as_select())
            .order(withdrawal_requests::requested_at.asc())
            .load::<WithdrawalRequestEntity>(&mut conn)?;

        Ok(pending)
    }

    async fn approve(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<WithdrawalRequestEntity, PayoutError, _>(|conn| {
            let request = Self::lock_pending(conn, request_id)?;

            // Authoritative sufficiency check: the debit re-reads the ledger
            // under its row lock. InsufficientAvailable rolls everything
            // back and the request stays pending for the operator.
            ledger_tx::apply_balance_op(
                conn,
                request.creator_id,
                AuditAction::DebitAvailable,
                &operator_id.to_string(),
                |balances| balances.debit_available(request.amount_minor),
            )?;

            let updated = diesel::update(withdrawal_requests::table.find(request_id))
                .set((
                    withdrawal_requests::status.eq(WithdrawalStatus::Approved.as_str()),
                    withdrawal_requests::processed_at.eq(Some(Utc::now())),
                    withdrawal_requests::processed_by.eq(Some(operator_id)),
                ))
                .returning(WithdrawalRequestEntity::as_returning())
                .get_result::<WithdrawalRequestEntity>(conn)?;

            Ok(updated)
        })
    }

    async fn reject(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
        reason: &str,
    ) -> PayoutResult<WithdrawalRequestEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<WithdrawalRequestEntity, PayoutError, _>(|conn| {
            Self::lock_pending(conn, request_id)?;

            let updated = diesel::update(withdrawal_requests::table.find(request_id))
                .set((
                    withdrawal_requests::status.eq(WithdrawalStatus::Rejected.as_str()),
                    withdrawal_requests::processed_at.eq(Some(Utc::now())),
                    withdrawal_requests::processed_by.eq(Some(operator_id)),
                    withdrawal_requests::rejection_reason.eq(Some(reason.to_string())),
                ))
                .returning(WithdrawalRequestEntity::as_returning())
                .get_result::<WithdrawalRequestEntity>(conn)?;

            Ok(updated)
        })
    }

    async fn approved_totals(&self) -> PayoutResult<Vec<CreatorApprovedTotals>> {
        let mut conn = get_conn(&self.db_pool)?;

        let rows: Vec<(Uuid, i64)> = withdrawal_requests::table
            .filter(withdrawal_requests::status.eq(WithdrawalStatus::Approved.as_str()))
            .select((
                withdrawal_requests::creator_id,
                withdrawal_requests::amount_minor,
            ))
            .load(&mut conn)?;

        let mut totals: HashMap<Uuid, i64> = HashMap::new();
        for (creator_id, amount_minor) in rows {
            *totals.entry(creator_id).or_insert(0) += amount_minor;
        }

        Ok(totals
            .into_iter()
            .map(|(creator_id, approved_minor)| CreatorApprovedTotals {
                creator_id,
                approved_minor,
            })
            .collect())
    }
}
