use chrono::{DateTime, Utc};
use thiserror::Error;

/// Error kinds shared by the ledger, report, and withdrawal paths.
///
/// Balance-check failures are always surfaced to the caller, never clamped.
/// `InsufficientLocked` signals a prior inconsistency and is fatal for that
/// record: it must be investigated through the audit log, not retried.
#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("amount must be a positive number of minor units")]
    InvalidAmount,
    #[error("amount is below the minimum withdrawal of {minimum_minor} minor units")]
    BelowMinimum { minimum_minor: i64 },
    #[error("available balance is insufficient")]
    InsufficientAvailable,
    #[error("locked balance is insufficient; ledger requires manual review")]
    InsufficientLocked,
    #[error("target has already been processed")]
    AlreadyProcessed,
    #[error("not found")]
    NotFound,
    #[error("report is locked until {0}")]
    StillLocked(DateTime<Utc>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type PayoutResult<T> = Result<T, PayoutError>;

impl From<diesel::result::Error> for PayoutError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => PayoutError::NotFound,
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PayoutError::AlreadyProcessed
            }
            other => PayoutError::Internal(anyhow::Error::new(other)),
        }
    }
}
