use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::withdrawal_requests::{
    InsertWithdrawalRequestEntity, WithdrawalRequestEntity,
};
use crate::domain::errors::PayoutResult;
use crate::domain::value_objects::reconciliation::CreatorApprovedTotals;

#[async_trait]
#[automock]
pub trait WithdrawalRequestRepository {
    async fn create(
        &self,
        entity: InsertWithdrawalRequestEntity,
    ) -> PayoutResult<WithdrawalRequestEntity>;

    async fn find_by_id(&self, request_id: Uuid) -> PayoutResult<WithdrawalRequestEntity>;

    async fn list_pending(&self) -> PayoutResult<Vec<WithdrawalRequestEntity>>;

    /// One transaction: locks the request row, re-checks it is pending,
    /// debits the creator's available balance (the authoritative
    /// sufficiency check), and marks the request approved. On
    /// `InsufficientAvailable` the whole transaction rolls back and the
    /// request stays pending.
    async fn approve(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
    ) -> PayoutResult<WithdrawalRequestEntity>;

    /// Marks a pending request rejected; no ledger change, the funds stay
    /// available for a new request.
    async fn reject(
        &self,
        request_id: Uuid,
        operator_id: Uuid,
        reason: &str,
    ) -> PayoutResult<WithdrawalRequestEntity>;

    /// Recomputed per-creator approved sums, for the consistency sweep.
    async fn approved_totals(&self) -> PayoutResult<Vec<CreatorApprovedTotals>>;
}
