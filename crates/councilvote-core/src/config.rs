//! Site endpoints and the queried month window.

use chrono::NaiveDate;

use crate::error::MonthRangeError;

pub const DEFAULT_API_BASE: &str = "https://webapi.legistar.com/v1/phoenix";
pub const DEFAULT_SITE_BASE: &str = "https://phoenix.legistar.com";
/// Legistar body id of the City Council formal meeting.
pub const DEFAULT_BODY_ID: i64 = 138;

/// Where the API and the meeting site live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub api_base: String,
    pub site_base: String,
    pub body_id: i64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            body_id: DEFAULT_BODY_ID,
        }
    }
}

/// Months `start..end` of a year, start inclusive and end exclusive.
///
/// `end == 13` runs through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    start: u32,
    end: u32,
}

impl MonthRange {
    pub fn new(start: u32, end: u32) -> Result<Self, MonthRangeError> {
        if !(1..=12).contains(&start) {
            return Err(MonthRangeError::StartOutOfRange(start));
        }
        if !(2..=13).contains(&end) {
            return Err(MonthRangeError::EndOutOfRange(end));
        }
        if end <= start {
            return Err(MonthRangeError::Empty { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// First day of the window and first day after it, as `YYYY-MM-DD`.
    pub fn date_bounds(&self, year: i32) -> (String, String) {
        let first = format!("{year}-{:02}-01", self.start);
        let after = if self.end == 13 {
            format!("{}-01-01", year + 1)
        } else {
            format!("{year}-{:02}-01", self.end)
        };
        (first, after)
    }

    /// Calendar quarter containing the start month.
    pub fn quarter(&self) -> u32 {
        (self.start - 1) / 3 + 1
    }

    /// Whether `date` (`YYYY-MM-DD`) falls inside the window for `year`.
    pub fn contains(&self, year: i32, date: &str) -> bool {
        let (first, after) = self.date_bounds(year);
        let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        match (parse(&first), parse(&after), parse(date)) {
            (Some(first), Some(after), Some(date)) => first <= date && date < after,
            _ => false,
        }
    }
}

impl Default for MonthRange {
    fn default() -> Self {
        Self { start: 1, end: 4 }
    }
}
