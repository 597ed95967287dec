use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::monthly_reports::MonthlyReportEntity;
use crate::domain::entities::video_accruals::VideoAccrualEntity;

/// Per-video line of a monthly report, frozen at generation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoBreakdownEntry {
    pub video_id: Uuid,
    pub earnings_minor: i64,
    pub views: i64,
    pub premium_views: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSummary {
    pub payout_minor: i64,
    pub breakdown: Vec<VideoBreakdownEntry>,
}

impl PeriodSummary {
    pub fn is_empty(&self) -> bool {
        self.payout_minor == 0
    }

    pub fn summed_video_ids(&self) -> Vec<Uuid> {
        self.breakdown.iter().map(|entry| entry.video_id).collect()
    }
}

/// Folds a creator's current-period accruals into one report payload.
/// Videos that earned nothing this period contribute neither to the payout
/// nor to the breakdown, and their counters are left untouched.
pub fn summarize_period(accruals: &[VideoAccrualEntity]) -> PeriodSummary {
    let breakdown: Vec<VideoBreakdownEntry> = accruals
        .iter()
        .filter(|accrual| accrual.period_earnings_minor > 0)
        .map(|accrual| VideoBreakdownEntry {
            video_id: accrual.video_id,
            earnings_minor: accrual.period_earnings_minor,
            views: accrual.period_views,
            premium_views: accrual.period_premium_views,
        })
        .collect();

    PeriodSummary {
        payout_minor: breakdown.iter().map(|entry| entry.earnings_minor).sum(),
        breakdown,
    }
}

/// Who is unlocking a report. The scheduled sweep acts as `system`;
/// manual unlocks carry the operator's id into `unlocked_by` and the
/// audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockActor {
    Sweep,
    Operator(Uuid),
}

impl UnlockActor {
    pub fn audit_actor(&self) -> String {
        match self {
            UnlockActor::Sweep => "system".to_string(),
            UnlockActor::Operator(operator_id) => operator_id.to_string(),
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, UnlockActor::Operator(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportDto {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub period: String,
    pub payout_minor: i64,
    pub status: String,
    pub locked_until: DateTime<Utc>,
    pub unlocked_at: Option<DateTime<Utc>>,
    pub unlocked_by: Option<String>,
    pub video_breakdown: serde_json::Value,
}

impl From<MonthlyReportEntity> for ReportDto {
    fn from(entity: MonthlyReportEntity) -> Self {
        Self {
            id: entity.id,
            creator_id: entity.creator_id,
            period: entity.period,
            payout_minor: entity.payout_minor,
            status: entity.status,
            locked_until: entity.locked_until,
            unlocked_at: entity.unlocked_at,
            unlocked_by: entity.unlocked_by,
            video_breakdown: entity.video_breakdown,
        }
    }
}
