use std::fmt;

use chrono::NaiveDate;

use super::reference_zone::{
    reference_today, to_reference_date, to_reference_day_range, to_reference_month_range,
    to_reference_year_range, DateValue, IsoRange,
};

/// The calendar range a totals projection is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TotalsRange {
    /// A single reference-zone day.
    Day(NaiveDate),
    /// A calendar month.
    Month { year: i32, month: u32 },
    /// A calendar year.
    Year(i32),
}

impl TotalsRange {
    /// Builds a day range from a date input, resolved in the reference zone.
    pub fn day<'a>(value: impl Into<DateValue<'a>>) -> Option<Self> {
        to_reference_date(value).map(|date| Self::Day(date.date_naive()))
    }

    /// Today in the reference zone.
    pub fn today() -> Self {
        Self::Day(reference_today())
    }

    /// Builds a month range. Returns `None` if `month` is outside `1..=12`,
    /// `year` is 0, or the month has no representable boundaries.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        Some(Self::Month { year, month }).filter(|range| !range.bounds().is_empty())
    }

    /// Builds a year range. Returns `None` if `year` is 0 or the year has no
    /// representable boundaries.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self::Year(year)).filter(|range| !range.bounds().is_empty())
    }

    /// Stable identity of the range: `2024-03-01`, `2024-03` or `2024`.
    pub fn key(&self) -> String {
        match self {
            Self::Day(date) => date.format("%Y-%m-%d").to_string(),
            Self::Month { year, month } => format!("{year:04}-{month:02}"),
            Self::Year(year) => format!("{year:04}"),
        }
    }

    /// Human-readable label for report headers.
    pub fn label(&self) -> String {
        match self {
            Self::Day(date) => date.format("%d %b %Y").to_string(),
            Self::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|first| first.format("%B %Y").to_string())
                .unwrap_or_else(|| self.key()),
            Self::Year(year) => year.to_string(),
        }
    }

    /// Half-open query boundaries for the range.
    pub fn bounds(&self) -> IsoRange {
        match self {
            Self::Day(date) => to_reference_day_range(*date),
            Self::Month { year, month } => to_reference_month_range(*year, *month),
            Self::Year(year) => to_reference_year_range(*year),
        }
    }
}

impl fmt::Display for TotalsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
