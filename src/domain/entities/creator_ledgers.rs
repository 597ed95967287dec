use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::value_objects::balances::BalanceSet;
use crate::infrastructure::postgres::schema::creator_ledgers;

/// The authoritative per-creator balance record. Only the ledger operations
/// in the postgres layer may write these columns.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = creator_ledgers, primary_key(creator_id))]
pub struct CreatorLedgerEntity {
    pub creator_id: Uuid,
    pub total_earnings_minor: i64,
    pub locked_balance_minor: i64,
    pub available_balance_minor: i64,
    pub total_withdrawn_minor: i64,
    pub updated_at: DateTime<Utc>,
}

impl CreatorLedgerEntity {
    pub fn balances(&self) -> BalanceSet {
        BalanceSet {
            total_earnings_minor: self.total_earnings_minor,
            locked_balance_minor: self.locked_balance_minor,
            available_balance_minor: self.available_balance_minor,
            total_withdrawn_minor: self.total_withdrawn_minor,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = creator_ledgers)]
pub struct InsertCreatorLedgerEntity {
    pub creator_id: Uuid,
    pub total_earnings_minor: i64,
    pub locked_balance_minor: i64,
    pub available_balance_minor: i64,
    pub total_withdrawn_minor: i64,
}

impl InsertCreatorLedgerEntity {
    pub fn zeroed(creator_id: Uuid) -> Self {
        Self {
            creator_id,
            total_earnings_minor: 0,
            locked_balance_minor: 0,
            available_balance_minor: 0,
            total_withdrawn_minor: 0,
        }
    }
}
