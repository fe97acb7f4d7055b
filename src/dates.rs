//! Date handling at the store boundary.
//!
//! Inputs arrive as ISO `YYYY-MM-DD`. Journals persist `M/D/YYYY`, and
//! confirmations use long-form renderings.

use crate::error::{HrError, Result};
use chrono::NaiveDate;

const ISO_FORMAT: &str = "%Y-%m-%d";
const JOURNAL_FORMAT: &str = "%-m/%-d/%Y";
const LONG_FORMAT: &str = "%-d %B %Y";
const WEEKDAY_LONG_FORMAT: &str = "%A, %-d %B %Y";

pub fn parse_iso(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT)
        .map_err(|_| HrError::InvalidDate(s.to_string()))
}

/// `3/10/2025` style, as written to the journals
pub fn journal_date(date: NaiveDate) -> String {
    date.format(JOURNAL_FORMAT).to_string()
}

/// `3 October 2025`
pub fn long_date(date: NaiveDate) -> String {
    date.format(LONG_FORMAT).to_string()
}

/// `Friday, 3 October 2025`
pub fn weekday_long_date(date: NaiveDate) -> String {
    date.format(WEEKDAY_LONG_FORMAT).to_string()
}
