use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::video_accruals::{InsertVideoAccrualEntity, VideoAccrualEntity};
use crate::domain::errors::PayoutResult;
use crate::domain::value_objects::accruals::AccrualDelta;

#[async_trait]
#[automock]
pub trait VideoAccrualRepository {
    /// Fails with `AlreadyProcessed` when the video is already registered.
    async fn register_video(
        &self,
        entity: InsertVideoAccrualEntity,
    ) -> PayoutResult<VideoAccrualEntity>;

    /// Atomically adds a validated delta to both the period and lifetime
    /// counters of one video.
    async fn apply_delta(
        &self,
        video_id: Uuid,
        delta: AccrualDelta,
    ) -> PayoutResult<VideoAccrualEntity>;

    async fn find_by_video(&self, video_id: Uuid) -> PayoutResult<VideoAccrualEntity>;
}
