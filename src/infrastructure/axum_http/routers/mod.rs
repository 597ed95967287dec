pub mod accruals;
pub mod creators;
pub mod reconciliation;
pub mod reports;
pub mod withdrawals;
