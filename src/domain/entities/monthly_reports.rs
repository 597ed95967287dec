use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::monthly_reports;

/// Immutable snapshot of one creator's earnings for one period. The payout
/// amount never changes after creation; only the lock status moves, once.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = monthly_reports)]
pub struct MonthlyReportEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub period: String,
    pub payout_minor: i64,
    pub status: String,
    pub locked_until: DateTime<Utc>,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub unlocked_by: Option<String>,
    pub video_breakdown: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = monthly_reports)]
pub struct InsertMonthlyReportEntity {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub period: String,
    pub payout_minor: i64,
    pub status: String,
    pub locked_until: DateTime<Utc>,
    pub video_breakdown: serde_json::Value,
}
