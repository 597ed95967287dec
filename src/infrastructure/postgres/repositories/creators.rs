use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::creator_ledgers::InsertCreatorLedgerEntity;
use crate::domain::entities::creators::{CreatorEntity, InsertCreatorEntity};
use crate::domain::errors::{PayoutError, PayoutResult};
use crate::domain::repositories::creators::CreatorRepository;
use crate::domain::value_objects::enums::creator_statuses::CreatorStatus;
use crate::infrastructure::postgres::{
    get_conn,
    postgres_connection::PgPoolSquad,
    schema::{creator_ledgers, creators},
};

pub struct CreatorPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CreatorPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CreatorRepository for CreatorPostgres {
    async fn onboard(&self, entity: InsertCreatorEntity) -> PayoutResult<CreatorEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        conn.transaction::<CreatorEntity, PayoutError, _>(|conn| {
            let creator = diesel::insert_into(creators::table)
                .values(&entity)
                .returning(CreatorEntity::as_returning())
                .get_result::<CreatorEntity>(conn)?;

            diesel::insert_into(creator_ledgers::table)
                .values(&InsertCreatorLedgerEntity::zeroed(creator.id))
                .execute(conn)?;

            Ok(creator)
        })
    }

    async fn find_by_id(&self, creator_id: Uuid) -> PayoutResult<CreatorEntity> {
        let mut conn = get_conn(&self.db_pool)?;

        let creator = creators::table
            .find(creator_id)
            .select(CreatorEntity::as_select())
            .first::<CreatorEntity>(&mut conn)?;

        Ok(creator)
    }

    async fn list_active_ids(&self) -> PayoutResult<Vec<Uuid>> {
        let mut conn = get_conn(&self.db_pool)?;

        let ids = creators::table
            .filter(creators::status.eq(CreatorStatus::Active.as_str()))
            .select(creators::id)
            .order(creators::id.asc())
            .load::<Uuid>(&mut conn)?;

        Ok(ids)
    }
}
