use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::audit_entries::AuditEntryEntity;
use crate::domain::errors::PayoutResult;

/// Read side of the audit trail. Writes happen inside the ledger
/// transactions themselves so audit and balances can never diverge.
#[async_trait]
#[automock]
pub trait AuditLogRepository {
    async fn list_for_target(
        &self,
        target: &str,
        limit: i64,
    ) -> PayoutResult<Vec<AuditEntryEntity>>;
}
