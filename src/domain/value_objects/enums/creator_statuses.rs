use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CreatorStatus {
    Active,
    Suspended,
}

impl CreatorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorStatus::Active => "active",
            CreatorStatus::Suspended => "suspended",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "active" => Some(CreatorStatus::Active),
            "suspended" => Some(CreatorStatus::Suspended),
            _ => None,
        }
    }
}

impl Display for CreatorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
