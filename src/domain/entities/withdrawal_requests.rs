use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::withdrawal_requests;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = withdrawal_requests)]
pub struct WithdrawalRequestEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub amount_minor: i64,
    pub method: String,
    pub details: serde_json::Value,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
    pub processed_by: Option<Uuid>,
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = withdrawal_requests)]
pub struct InsertWithdrawalRequestEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub amount_minor: i64,
    pub method: String,
    pub details: serde_json::Value,
    pub status: String,
}
