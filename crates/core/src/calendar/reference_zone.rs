//! Calendar arithmetic in the fixed reference zone (UTC+05:30).
//!
//! Every calendar key and every query boundary is computed in the reference
//! offset, never in the timezone of the machine running the code. Range ends
//! are exclusive: callers query with `start <= x < end`.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

/// Offset of the reference zone from UTC, in minutes.
pub const REFERENCE_OFFSET_MINUTES: i32 = 330;

/// Format of a canonical per-day key.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns the fixed reference offset.
pub fn reference_offset() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_MINUTES * 60)
        .expect("UTC+05:30 is within the valid offset range")
}

/// A date input as it arrives from callers: free text or an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue<'a> {
    /// A date-only key (`2024-03-01`) or a timestamp (`2024-03-01T10:00:00Z`).
    Text(&'a str),
    /// An absolute instant.
    Instant(DateTime<Utc>),
}

impl<'a> From<&'a str> for DateValue<'a> {
    fn from(value: &'a str) -> Self {
        DateValue::Text(value)
    }
}

impl<'a> From<&'a String> for DateValue<'a> {
    fn from(value: &'a String) -> Self {
        DateValue::Text(value.as_str())
    }
}

impl From<DateTime<Utc>> for DateValue<'_> {
    fn from(value: DateTime<Utc>) -> Self {
        DateValue::Instant(value)
    }
}

impl From<DateTime<FixedOffset>> for DateValue<'_> {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateValue::Instant(value.with_timezone(&Utc))
    }
}

/// Half-open query boundaries as UTC ISO text.
///
/// Both fields are empty when the input that produced the range was invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsoRange {
    pub start_iso: String,
    pub end_iso: String,
}

impl IsoRange {
    /// Returns true if either boundary is missing.
    pub fn is_empty(&self) -> bool {
        self.start_iso.is_empty() || self.end_iso.is_empty()
    }

    fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let start_iso = start.and_then(reference_midnight).map(format_iso);
        let end_iso = end.and_then(reference_midnight).map(format_iso);
        match (start_iso, end_iso) {
            (Some(start_iso), Some(end_iso)) => Self { start_iso, end_iso },
            _ => Self::default(),
        }
    }
}

/// Returns the instant of midnight on `date` in the reference zone.
pub fn reference_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    reference_offset()
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .single()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Returns today's date in the reference zone.
pub fn reference_today() -> NaiveDate {
    Utc::now().with_timezone(&reference_offset()).date_naive()
}

/// Formats an instant as UTC ISO text with millisecond precision.
pub fn format_iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses text into an absolute instant.
///
/// Date-only keys are read as midnight in the reference zone. Timestamps with
/// an explicit offset honor it; timestamps without one are read as
/// reference-zone wall-clock time.
fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if !text.contains('T') {
        let date = NaiveDate::parse_from_str(text, DATE_KEY_FORMAT).ok()?;
        return reference_midnight(date);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .ok()?;
    reference_offset()
        .from_local_datetime(&naive)
        .single()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Expresses a date input in the reference zone.
///
/// The wall-clock fields of the returned value are the reference-zone date
/// and time. Returns `None` for empty or unparsable input.
pub fn to_reference_date<'a>(value: impl Into<DateValue<'a>>) -> Option<DateTime<FixedOffset>> {
    let instant = match value.into() {
        DateValue::Text(text) => parse_instant(text)?,
        DateValue::Instant(instant) => instant,
    };
    Some(instant.with_timezone(&reference_offset()))
}

/// Returns the `YYYY-MM-DD` reference-zone key for a date input, or an empty
/// string if the input cannot be parsed.
pub fn to_reference_date_key<'a>(value: impl Into<DateValue<'a>>) -> String {
    to_reference_date(value)
        .map(|date| date.format(DATE_KEY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Returns the UTC ISO instant of reference-zone midnight for a date key, or
/// an empty string if the key cannot be parsed.
///
/// ```
/// use checkpost_core::calendar::to_reference_iso;
///
/// assert_eq!(to_reference_iso("2024-01-15"), "2024-01-14T18:30:00.000Z");
/// assert_eq!(to_reference_iso("not-a-date"), "");
/// ```
pub fn to_reference_iso(date_key: &str) -> String {
    NaiveDate::parse_from_str(date_key.trim(), DATE_KEY_FORMAT)
        .ok()
        .and_then(reference_midnight)
        .map(format_iso)
        .unwrap_or_default()
}

/// Boundaries of a single reference-zone day: `[date, date + 1)`.
pub fn to_reference_day_range(date: NaiveDate) -> IsoRange {
    IsoRange::between(Some(date), date.succ_opt())
}

/// Boundaries of a calendar month in the reference zone.
///
/// Returns an empty range when `month` is outside `1..=12`, `year` is 0, or
/// either boundary falls outside the representable calendar.
pub fn to_reference_month_range(year: i32, month: u32) -> IsoRange {
    if year == 0 || !(1..=12).contains(&month) {
        return IsoRange::default();
    }
    let next = if month == 12 {
        year.checked_add(1).map(|next_year| (next_year, 1))
    } else {
        Some((year, month + 1))
    };
    IsoRange::between(
        NaiveDate::from_ymd_opt(year, month, 1),
        next.and_then(|(next_year, next_month)| NaiveDate::from_ymd_opt(next_year, next_month, 1)),
    )
}

/// Boundaries of a calendar year in the reference zone.
///
/// Returns an empty range when `year` is 0 or either boundary falls outside
/// the representable calendar.
pub fn to_reference_year_range(year: i32) -> IsoRange {
    if year == 0 {
        return IsoRange::default();
    }
    IsoRange::between(
        NaiveDate::from_ymd_opt(year, 1, 1),
        year.checked_add(1)
            .and_then(|next_year| NaiveDate::from_ymd_opt(next_year, 1, 1)),
    )
}
