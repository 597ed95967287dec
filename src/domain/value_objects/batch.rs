use serde::Serialize;
use uuid::Uuid;

/// One failed unit of a batch run. Batches never abort on a single item;
/// they collect failures and keep going.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ItemFailure {
    pub id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportGenerationTally {
    pub period: String,
    pub generated: usize,
    pub skipped_existing: usize,
    pub skipped_empty: usize,
    pub failed: Vec<ItemFailure>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UnlockSweepTally {
    pub due: usize,
    pub unlocked: usize,
    pub already_unlocked: usize,
    pub failed: Vec<ItemFailure>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BulkItemOutcome {
    pub request_id: Uuid,
    pub ok: bool,
    pub error: Option<String>,
}
