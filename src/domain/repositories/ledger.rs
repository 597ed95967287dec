use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::creator_ledgers::CreatorLedgerEntity;
use crate::domain::errors::PayoutResult;

/// The single owner of a creator's four balance fields. Each mutating
/// operation runs as one transaction that locks the ledger row, applies the
/// balance transition, and appends the audit entry; `actor` is who is
/// recorded on that entry.
#[async_trait]
#[automock]
pub trait LedgerRepository {
    async fn find_by_creator(&self, creator_id: Uuid) -> PayoutResult<CreatorLedgerEntity>;

    async fn list_all(&self) -> PayoutResult<Vec<CreatorLedgerEntity>>;

    async fn credit_locked(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity>;

    async fn unlock_to_available(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity>;

    async fn debit_available(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity>;

    async fn reverse_debit(
        &self,
        creator_id: Uuid,
        amount_minor: i64,
        actor: &str,
    ) -> PayoutResult<CreatorLedgerEntity>;
}
