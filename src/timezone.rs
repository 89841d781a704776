//! Resolving canonical time zone names to the offsets used for day bucketing.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// Get the UTC offset of `canonical_timezone` at the instant `at`.
///
/// `canonical_timezone` is an IANA name such as "Asia/Kolkata" or
/// "Pacific/Auckland". The offset depends on `at` for zones with daylight
/// saving time.
///
/// # Errors
///
/// Returns [Error::InvalidTimezone] if the name is not a known time zone.
pub fn get_local_offset(canonical_timezone: &str, at: OffsetDateTime) -> Result<UtcOffset, Error> {
    if canonical_timezone.eq_ignore_ascii_case("UTC") {
        return Ok(UtcOffset::UTC);
    }

    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&at).to_utc())
        .ok_or_else(|| Error::InvalidTimezone(canonical_timezone.to_owned()))
}

/// The calendar date it currently is at `offset`.
pub fn local_today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}
