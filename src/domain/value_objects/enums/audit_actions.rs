use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// The ledger operation recorded on an audit entry. One entry is written
/// per balance mutation, inside the same transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuditAction {
    CreditLocked,
    UnlockToAvailable,
    DebitAvailable,
    ReverseDebit,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::CreditLocked => "credit_locked",
            AuditAction::UnlockToAvailable => "unlock_to_available",
            AuditAction::DebitAvailable => "debit_available",
            AuditAction::ReverseDebit => "reverse_debit",
        }
    }
}

impl Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
