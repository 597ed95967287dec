use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::video_accruals::{InsertVideoAccrualEntity, VideoAccrualEntity};
use crate::domain::errors::PayoutResult;
use crate::domain::repositories::creators::CreatorRepository;
use crate::domain::repositories::video_accrual::VideoAccrualRepository;
use crate::domain::value_objects::accruals::AccrualDelta;

/// Write path for the external view-accrual feed. The feed computes the
/// earnings; the core owns the counters and their invariants.
pub struct AccrualIngestUseCase {
    accrual_repo: Arc<dyn VideoAccrualRepository + Send + Sync>,
    creator_repo: Arc<dyn CreatorRepository + Send + Sync>,
}

impl AccrualIngestUseCase {
    pub fn new(
        accrual_repo: Arc<dyn VideoAccrualRepository + Send + Sync>,
        creator_repo: Arc<dyn CreatorRepository + Send + Sync>,
    ) -> Self {
        Self {
            accrual_repo,
            creator_repo,
        }
    }

    pub async fn register_video(
        &self,
        video_id: Uuid,
        creator_id: Uuid,
    ) -> PayoutResult<VideoAccrualEntity> {
        self.creator_repo.find_by_id(creator_id).await.map_err(|err| {
            warn!(%video_id, %creator_id, error = ?err, "accrual_ingest: unknown creator");
            err
        })?;

        let accrual = self
            .accrual_repo
            .register_video(InsertVideoAccrualEntity::registered(video_id, creator_id))
            .await?;

        info!(%video_id, %creator_id, "accrual_ingest: video registered");

        Ok(accrual)
    }

    pub async fn apply_delta(
        &self,
        video_id: Uuid,
        delta: AccrualDelta,
    ) -> PayoutResult<VideoAccrualEntity> {
        delta.validate().map_err(|err| {
            warn!(
                %video_id,
                earnings_minor = delta.earnings_minor,
                views = delta.views,
                premium_views = delta.premium_views,
                "accrual_ingest: invalid delta"
            );
            err
        })?;

        let accrual = self.accrual_repo.apply_delta(video_id, delta).await?;

        info!(
            %video_id,
            earnings_minor = delta.earnings_minor,
            views = delta.views,
            period_earnings_minor = accrual.period_earnings_minor,
            "accrual_ingest: delta applied"
        );

        Ok(accrual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::creators::CreatorEntity;
    use crate::domain::errors::PayoutError;
    use crate::domain::repositories::creators::MockCreatorRepository;
    use crate::domain::repositories::video_accrual::MockVideoAccrualRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn creator(creator_id: Uuid) -> CreatorEntity {
        CreatorEntity {
            id: creator_id,
            display_name: Some("Creator".to_string()),
            status: "active".to_string(),
            created_at: Utc::now(),
        }
    }

    fn accrual(video_id: Uuid, creator_id: Uuid) -> VideoAccrualEntity {
        VideoAccrualEntity {
            video_id,
            creator_id,
            lifetime_views: 0,
            lifetime_premium_views: 0,
            lifetime_earnings_minor: 0,
            period_views: 0,
            period_premium_views: 0,
            period_earnings_minor: 0,
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn registers_video_with_zeroed_counters() {
        let video_id = Uuid::new_v4();
        let creator_id = Uuid::new_v4();

        let mut creator_repo = MockCreatorRepository::new();
        creator_repo
            .expect_find_by_id()
            .with(eq(creator_id))
            .returning(move |creator_id| Box::pin(async move { Ok(creator(creator_id)) }));

        let mut accrual_repo = MockVideoAccrualRepository::new();
        accrual_repo
            .expect_register_video()
            .withf(move |entity| {
                entity.video_id == video_id
                    && entity.creator_id == creator_id
                    && entity.period_earnings_minor == 0
            })
            .returning(move |entity| {
                Box::pin(async move { Ok(accrual(entity.video_id, entity.creator_id)) })
            });

        let usecase = AccrualIngestUseCase::new(Arc::new(accrual_repo), Arc::new(creator_repo));
        let result = usecase.register_video(video_id, creator_id).await.unwrap();

        assert_eq!(result.video_id, video_id);
        assert_eq!(result.period_earnings_minor, 0);
    }

    #[tokio::test]
    async fn registering_for_unknown_creator_fails() {
        let mut creator_repo = MockCreatorRepository::new();
        creator_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Err(PayoutError::NotFound) }));

        let mut accrual_repo = MockVideoAccrualRepository::new();
        accrual_repo.expect_register_video().never();

        let usecase = AccrualIngestUseCase::new(Arc::new(accrual_repo), Arc::new(creator_repo));
        let result = usecase.register_video(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(PayoutError::NotFound)));
    }

    #[tokio::test]
    async fn invalid_delta_never_reaches_the_store() {
        let creator_repo = MockCreatorRepository::new();
        let mut accrual_repo = MockVideoAccrualRepository::new();
        accrual_repo.expect_apply_delta().never();

        let usecase = AccrualIngestUseCase::new(Arc::new(accrual_repo), Arc::new(creator_repo));
        let result = usecase
            .apply_delta(
                Uuid::new_v4(),
                AccrualDelta {
                    earnings_minor: -5,
                    views: 0,
                    premium_views: 0,
                },
            )
            .await;

        assert!(matches!(result, Err(PayoutError::InvalidAmount)));
    }

    #[tokio::test]
    async fn valid_delta_is_forwarded() {
        let video_id = Uuid::new_v4();
        let creator_id = Uuid::new_v4();
        let delta = AccrualDelta {
            earnings_minor: 1250,
            views: 40,
            premium_views: 4,
        };

        let creator_repo = MockCreatorRepository::new();
        let mut accrual_repo = MockVideoAccrualRepository::new();
        accrual_repo
            .expect_apply_delta()
            .withf(move |id, delta| *id == video_id && delta.earnings_minor == 1250)
            .returning(move |video_id, delta| {
                Box::pin(async move {
                    Ok(VideoAccrualEntity {
                        period_views: delta.views,
                        period_premium_views: delta.premium_views,
                        period_earnings_minor: delta.earnings_minor,
                        lifetime_views: delta.views,
                        lifetime_premium_views: delta.premium_views,
                        lifetime_earnings_minor: delta.earnings_minor,
                        ..accrual(video_id, creator_id)
                    })
                })
            });

        let usecase = AccrualIngestUseCase::new(Arc::new(accrual_repo), Arc::new(creator_repo));
        let result = usecase.apply_delta(video_id, delta).await.unwrap();

        assert_eq!(result.period_earnings_minor, 1250);
        assert_eq!(result.lifetime_views, 40);
    }
}
