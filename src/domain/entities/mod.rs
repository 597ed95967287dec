pub mod audit_entries;
pub mod creator_ledgers;
pub mod creators;
pub mod monthly_reports;
pub mod video_accruals;
pub mod withdrawal_requests;
