use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::creators::{CreatorEntity, InsertCreatorEntity};
use crate::domain::errors::PayoutResult;

#[async_trait]
#[automock]
pub trait CreatorRepository {
    /// Creates the creator row and its zeroed ledger row in one
    /// transaction. The ledger is never created lazily anywhere else.
    async fn onboard(&self, entity: InsertCreatorEntity) -> PayoutResult<CreatorEntity>;

    async fn find_by_id(&self, creator_id: Uuid) -> PayoutResult<CreatorEntity>;

    async fn list_active_ids(&self) -> PayoutResult<Vec<Uuid>>;
}
