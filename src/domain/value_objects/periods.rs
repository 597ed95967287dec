use std::fmt::Display;

use chrono::{DateTime, Datelike, Utc};

/// A calendar month, the unit of report generation. Rendered as `YYYY-MM`,
/// which is also the persisted form on `monthly_reports.period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    /// The most recently completed period relative to `at`; what the
    /// rollover job generates reports for.
    pub fn preceding(at: DateTime<Utc>) -> Self {
        Self::containing(at).previous()
    }

    pub fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        let (year, month) = value.split_once('-')?;
        let year = year.parse::<i32>().ok()?;
        let month = month.parse::<u32>().ok()?;
        Self::new(year, month)
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
