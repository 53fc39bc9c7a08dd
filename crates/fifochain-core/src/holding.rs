//! Calendar dates and holding periods.

use chrono::NaiveDate;

/// Format of stage-table dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO calendar date, ignoring surrounding whitespace.
///
/// Returns `None` for blank or invalid input.
#[must_use]
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Whole days a lot was held, never negative.
///
/// A disposal dated before its lot's acquisition counts as zero days.
/// `None` when either date is unknown.
///
/// ```
/// use fifochain_core::holding_days;
/// use chrono::NaiveDate;
///
/// let bought = NaiveDate::from_ymd_opt(2024, 1, 5);
/// let sold = NaiveDate::from_ymd_opt(2024, 2, 1);
/// assert_eq!(holding_days(bought, sold), Some(27));
/// assert_eq!(holding_days(None, sold), None);
/// ```
#[must_use]
pub fn holding_days(acquired: Option<NaiveDate>, disposed: Option<NaiveDate>) -> Option<i64> {
    let (acquired, disposed) = (acquired?, disposed?);
    Some((disposed - acquired).num_days().max(0))
}
