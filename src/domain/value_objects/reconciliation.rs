use serde::Serialize;
use uuid::Uuid;

/// Per-creator sums recomputed from the report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorPayoutTotals {
    pub creator_id: Uuid,
    /// Sum of payout over all reports, locked or not.
    pub reported_minor: i64,
    /// Sum of payout over unlocked reports only.
    pub unlocked_minor: i64,
}

/// Per-creator sum of approved withdrawal amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorApprovedTotals {
    pub creator_id: Uuid,
    pub approved_minor: i64,
}

/// A ledger whose stored balances disagree with the recomputed sums.
/// Reported, never auto-corrected; resolution goes through the audit log.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LedgerDrift {
    pub creator_id: Uuid,
    pub total_earnings_minor: i64,
    pub reported_payout_minor: i64,
    pub available_balance_minor: i64,
    pub expected_available_minor: i64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconciliationReport {
    pub checked: usize,
    pub drifts: Vec<LedgerDrift>,
}
