//! Balance mutation primitive shared by every transaction that touches a
//! creator's ledger. Callers must already be inside a diesel transaction;
//! the row lock taken here is what serializes concurrent postings against
//! the same creator.

use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::audit_entries::InsertAuditEntryEntity;
use crate::domain::entities::creator_ledgers::CreatorLedgerEntity;
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::value_objects::balances::BalanceSet;
use crate::domain::value_objects::enums::audit_actions::AuditAction;
use crate::infrastructure::postgres::schema::{audit_log, creator_ledgers};

/// Locks the creator's ledger row, applies `transition` to the current
/// balances, persists the result, and appends the audit entry carrying the
/// before/after snapshot. The audit insert shares the caller's transaction,
/// so balances and audit trail commit or roll back together.
pub(crate) fn apply_balance_op(
    conn: &mut PgConnection,
    creator_id: Uuid,
    action: AuditAction,
    actor: &str,
    transition: impl FnOnce(BalanceSet) -> PayoutResult<BalanceSet>,
) -> PayoutResult<CreatorLedgerEntity> {
    let ledger: CreatorLedgerEntity = creator_ledgers::table
        .find(creator_id)
        .select(CreatorLedgerEntity::as_select())
        .for_update()
        .first(conn)?;

    let before = ledger.balances();
    let after = transition(before)?;

    let updated = diesel::update(creator_ledgers::table.find(creator_id))
        .set((
            creator_ledgers::total_earnings_minor.eq(after.total_earnings_minor),
            creator_ledgers::locked_balance_minor.eq(after.locked_balance_minor),
            creator_ledgers::available_balance_minor.eq(after.available_balance_minor),
            creator_ledgers::total_withdrawn_minor.eq(after.total_withdrawn_minor),
            creator_ledgers::updated_at.eq(Utc::now()),
        ))
        .returning(CreatorLedgerEntity::as_returning())
        .get_result::<CreatorLedgerEntity>(conn)?;

    let entry = InsertAuditEntryEntity {
        action: action.to_string(),
        actor: actor.to_string(),
        target: creator_id.to_string(),
        before_state: serde_json::to_value(before).map_err(internal)?,
        after_state: serde_json::to_value(after).map_err(internal)?,
    };
    diesel::insert_into(audit_log::table)
        .values(&entry)
        .execute(conn)?;

    Ok(updated)
}

fn internal(err: serde_json::Error) -> PayoutError {
    PayoutError::Internal(err.into())
}
