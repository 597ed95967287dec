use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::creator_ledgers::CreatorLedgerEntity;
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::ledger::LedgerRepository;
use crate::domain::value_objects::balances::BalanceSet;
use crate::domain::value_objects::enums::audit_actions::AuditAction;
use crate::infrastructure::postgres::{
    get_conn, ledger_tx, postgres_connection::PgPoolSquad, schema::creator_ledgers,
};

pub struct LedgerPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LedgerPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }

    fn run_balance_op(
        &self,
        creator_id: Uuid,
        action: AuditAction,
        actor: &str,
        transition: impl FnOnce(BalanceSet) -> PayoutResult<BalanceSet>,
    ) -> PayoutResult<CreatorLedgerEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<CreatorLedgerEntity, PayoutError, _>(|conn| {
            ledger_tx::apply_balance_op(conn, creator_id, action, actor, transition)
        })
    }
}

#[async_trait]
impl LedgerRepository for LedgerPostgres {
    async fn find_by_creator(&self, creator_id: Uuid) -> PayoutResult<CreatorLedgerEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let ledger = creator_ledgers::table
            .find(creator_id)
            .select(CreatorLedgerEntity::as_select())
            .first::<CreatorLedgerEntity>(&mut conn)?;

        Ok(ledger)
    }

    async fn list_all(&self) -> PayoutResult<Vec<CreatorLedgerEntity>> {
        let mut conn = get_conn(&self.db_pool)?;

        let ledgers = creator_ledgers::table
            .select(CreatorLedgerEntity::as_select())
            .order(creator_ledgers::creator_id.asc())
            .load::<CreatorLedgerEntity>(&mut conn)?;

        Ok(ledgers)
    }

    async fn credit_locked(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity> {
        self.run_balance_op(creator_id, AuditAction::CreditLocked, actor, |balances| {
            balances.credit_locked(amount_minor)
        })
    }

    async fn unlock_to_available(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity> {
        self.run_balance_op(
            creator_id,
            AuditAction::UnlockToAvailable,
            actor,
            |balances| balances.unlock_to_available(amount_minor),
        )
    }

    async fn debit_available(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity> {
        self.run_balance_op(creator_id, AuditAction::DebitAvailable, actor, |balances| {
            balances.debit_available(amount_minor)
        })
    }

    async fn reverse_debit(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity> {
        self.run_balance_op(creator_id, AuditAction::ReverseDebit, actor, |balances| {
            balances.reverse_debit(amount_minor)
        })
    }
}
