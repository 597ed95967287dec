pub mod audit_log;
pub mod creators;
pub mod ledger;
pub mod monthly_report;
pub mod video_accrual;
pub mod withdrawal_request;
