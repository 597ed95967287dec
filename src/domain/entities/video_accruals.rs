use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::video_accruals;

/// Running counters for one video: lifetime totals plus the current-period
/// accrual that the Report Generator sweeps and zeroes at period close.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = video_accruals, primary_key(video_id))]
pub struct VideoAccrualEntity {
    pub video_id: Uuid,
    pub creator_id: Uuid,
    pub lifetime_views: i64,
    pub lifetime_premium_views: i64,
    pub lifetime_earnings_minor: i64,
    pub period_views: i64,
    pub period_premium_views: i64,
    pub period_earnings_minor: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = video_accruals)]
pub struct InsertVideoAccrualEntity {
    pub video_id: Uuid,
    pub creator_id: Uuid,
    pub lifetime_views: i64,
    pub lifetime_premium_views: i64,
    pub lifetime_earnings_minor: i64,
    pub period_views: i64,
    pub period_premium_views: i64,
    pub period_earnings_minor: i64,
}

impl InsertVideoAccrualEntity {
    pub fn registered(video_id: Uuid, creator_id: Uuid) -> Self {
        Self {
            video_id,
            creator_id,
            lifetime_views: 0,
            lifetime_premium_views: 0,
            lifetime_earnings_minor: 0,
            period_views: 0,
            period_premium_views: 0,
            period_earnings_minor: 0,
        }
    }
}
