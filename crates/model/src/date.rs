use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Catalog dates are always calendar days, written `YYYY-MM-DD`.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` catalog date.
///
/// # Examples
///
/// ```
/// use repodex_model::parse_date;
/// assert!(parse_date("2016-03-10").is_ok());
/// assert!(parse_date(" 2016-03-10 ").is_ok());
/// assert!(parse_date("2016-02-30").is_err());
/// assert!(parse_date("yesterday").is_err());
/// ```
pub fn parse_date(value: impl AsRef<str>) -> Result<Date> {
    let value = value.as_ref().trim();
    Date::parse(value, DATE_FORMAT).or_raise(|| ErrorKind::InvalidDate(value.to_string()))
}

/// Convert a millisecond Unix timestamp (as used by JSON repository indexes)
/// into the UTC calendar day it falls on.
pub fn date_from_unix_millis(millis: i64) -> Result<Date> {
    let nanos = i128::from(millis) * 1_000_000;
    Ok(OffsetDateTime::from_unix_timestamp_nanos(nanos).or_raise(|| ErrorKind::TimestampOutOfRange(millis))?.date())
}
