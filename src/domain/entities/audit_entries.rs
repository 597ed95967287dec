use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infrastructure::postgres::schema::audit_log;

/// Append-only record of one balance-affecting action, with the full
/// before/after snapshot of the creator's four balance fields.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = audit_log)]
pub struct AuditEntryEntity {
    pub id: i64,
    pub action: String,
    pub actor: String,
    pub target: String,
    pub before_state: serde_json::Value,
    pub after_state: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = audit_log)]
pub struct InsertAuditEntryEntity {
    pub action: String,
    pub actor: String,
    pub target: String,
    pub before_state: serde_json::Value,
    pub after_state: serde_json::Value,
}
