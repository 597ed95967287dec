use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::video_accruals::{InsertVideoAccrualEntity, VideoAccrualEntity};
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::video_accrual::VideoAccrualRepository;
use crate::domain::value_objects::accruals::AccrualDelta;
use crate::infrastructure::postgres::{
    get_conn, postgres_connection::PgPoolSquad, schema::video_accruals,
};

pub struct VideoAccrualPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl VideoAccrualPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl VideoAccrualRepository for VideoAccrualPostgres {
    async fn register_video(
        &self,
        entity: InsertVideoAccrualEntity,
    ) -> PayoutResult<VideoAccrualEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let accrual = diesel::insert_into(video_accruals::table)
            .values(&entity)
            .returning(VideoAccrualEntity::as_returning())
            .get_result::<VideoAccrualEntity>(&mut conn)?;

        Ok(accrual)
    }

    async fn apply_delta(
        &self,
        video_id: Uuid,
        delta: AccrualDelta,
    ) -> PayoutResult<VideoAccrualEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<VideoAccrualEntity, PayoutError, _>(|conn| {
            let row: VideoAccrualEntity = video_accruals::table
                .find(video_id)
                .select(VideoAccrualEntity::as_select())
                .for_update()
                .first(conn)?;

            let updated = diesel::update(video_accruals::table.find(video_id))
                .set((
                    video_accruals::period_views.eq(row.period_views + delta.views),
                    video_accruals::period_premium_views
                        .eq(row.period_premium_views + delta.premium_views),
                    video_accruals::period_earnings_minor
                        .eq(row.period_earnings_minor + delta.earnings_minor),
                    video_accruals::lifetime_views.eq(row.lifetime_views + delta.views),
                    video_accruals::lifetime_premium_views
                        .eq(row.lifetime_premium_views + delta.premium_views),
                    video_accruals::lifetime_earnings_minor
                        .eq(row.lifetime_earnings_minor + delta.earnings_minor),
                    video_accruals::updated_at.eq(Utc::now()),
                ))
                .returning(VideoAccrualEntity::as_returning())
                .get_result::<VideoAccrualEntity>(conn)?;

            Ok(updated)
        })
    }

    async fn find_by_video(&self, video_id: Uuid) -> PayoutResult<VideoAccrualEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let accrual = video_accruals::table
            .find(video_id)
            .select(VideoAccrualEntity::as_select())
            .first::<VideoAccrualEntity>(&mut conn)?;

        Ok(accrual)
    }
}
