use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ReportStatus {
    Locked,
    Unlocked,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Locked => "locked",
            ReportStatus::Unlocked => "unlocked",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "locked" => Some(ReportStatus::Locked),
            "unlocked" => Some(ReportStatus::Unlocked),
            _ => None,
        }
    }
}

impl Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
