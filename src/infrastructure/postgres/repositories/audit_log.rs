use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::audit_entries::AuditEntryEntity;
use crate::domain::errors::PayoutResult;
use crate::domain::repositories::audit_log::AuditLogRepository;
use crate::infrastructure::postgres::{
    get_conn, postgres_connection::PgPoolSquad, schema::audit_log,
};
use diesel::prelude::*;

pub struct AuditLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AuditLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AuditLogRepository for AuditLogPostgres {
    async fn list_for_target(
        &self,
        target: &str,
        limit: i64,
    ) -> PayoutResult<Vec<AuditEntryEntity>> {
        let mut conn = get_conn(&self.db_pool)?;

        let entries = audit_log::table
            .filter(audit_log::target.eq(target))
            .select(AuditEntryEntity::as_select())
            .order(audit_log::created_at.desc())
            .limit(limit)
            .load::<AuditEntryEntity>(&mut conn)?;

        Ok(entries)
    }
}
