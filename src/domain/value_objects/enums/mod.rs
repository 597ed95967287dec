pub mod audit_actions;
pub mod creator_statuses;
pub mod report_statuses;
pub mod withdrawal_methods;
pub mod withdrawal_statuses;
