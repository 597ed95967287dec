use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// How the operator pays the creator once a request is approved. Execution
/// is manual and external; the core only records the chosen method.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalMethod {
    Paypal,
    BankTransfer,
}

impl WithdrawalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalMethod::Paypal => "paypal",
            WithdrawalMethod::BankTransfer => "bank_transfer",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "paypal" => Some(WithdrawalMethod::Paypal),
            "bank_transfer" => Some(WithdrawalMethod::BankTransfer),
            _ => None,
        }
    }
}

impl Display for WithdrawalMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
