use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::creators;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = creators)]
pub struct CreatorEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = creators)]
pub struct InsertCreatorEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub status: String,
}
