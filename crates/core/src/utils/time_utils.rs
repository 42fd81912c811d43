use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Default reference timezone for capture dates and "today" in the notation API.
pub const DEFAULT_REFERENCE_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to the calendar date seen in the given timezone.
pub fn local_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in the given timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date_from_utc(Utc::now(), tz)
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parses an IANA timezone name such as `America/New_York`.
pub fn parse_timezone(raw: &str) -> Option<Tz> {
    raw.trim().parse::<Tz>().ok()
}
