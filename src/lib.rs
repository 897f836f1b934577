//! Selection engine for calendar date pickers.
//!
//! The crate models what happens behind a date picker widget: which date
//! or date range is selected, how clicks, drags, hovers and key presses
//! move that selection, and which days of a displayed month render as
//! selected. Rendering and input plumbing stay with the caller.

mod clock;
mod config;
mod consts;
mod format;
mod grid;
mod keyboard;
mod machine;
mod navigation;
mod prelude;
mod preset;
mod range;
mod types;

#[cfg(test)]
mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Constraints, InvalidPickPolicy, Mode, PickerConfig};
pub use consts::*;
pub use format::{Locale, display_value, format_date, rotate_week_days};
pub use grid::{CellState, DisplayCell, Grid, project};
pub use keyboard::{GridKey, Highlight, KeyOutcome};
pub use machine::{DragEndpoint, SelectionMachine, Transition};
pub use navigation::{CompletionToken, NavigationGate, month_options, year_options, year_switch};
pub use preset::{Preset, PresetRange, available_presets, matching_preset, preset_range, preset_ranges};
pub use range::{RangePosition, Selection, SelectionError, SelectionInput, classify};
pub use types::{Weekday, YearMonth, days_in_month, is_leap_year};

use crate::prelude::*;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A proleptic Gregorian calendar day with no time or zone attached.
///
/// Always a real date: February 30 cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct CalendarDate {
    // field order gives chronological Ord
    year:  u16,
    month: u8,
    day:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid weekday: {_0} (must be 0-6)")]
    InvalidWeekday(u8),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

impl CalendarDate {
    /// Creates a date, rejecting anything that is not a real calendar day.
    ///
    /// # Errors
    /// Returns the `ParseError` variant naming the first offending field.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        if year == 0 || year > MAX_YEAR {
            return Err(ParseError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(ParseError::InvalidMonth(month));
        }
        if day < MIN_DAY || day > days_in_month(year, month) {
            return Err(ParseError::InvalidDay { month, day, year });
        }
        Ok(Self { year, month, day })
    }

    /// Callers guarantee the triple is a real date.
    pub(crate) const fn from_valid(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    pub const fn year(self) -> u16 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    /// Returns the (year, month, day) triple.
    pub const fn to_tuple(&self) -> (u16, u8, u8) {
        (self.year, self.month, self.day)
    }

    /// Seconds since the Unix epoch at midnight of this day.
    ///
    /// Only meaningful for ordering and distances; dates carry no zone, so
    /// midnight is taken in UTC and every day is exactly `SECONDS_PER_DAY` long.
    pub fn timestamp(&self) -> i64 {
        self.days_since_epoch() * SECONDS_PER_DAY
    }

    /// Whole days since 1970-01-01 (negative before it).
    pub fn days_since_epoch(&self) -> i64 {
        i64::from(self.to_naive().num_days_from_ce()) - i64::from(UNIX_EPOCH_DAYS_FROM_CE)
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.days_since_epoch() - self.days_since_epoch()
    }

    /// Shifts by a number of days, or `None` if the result leaves years 1..=9999.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let shifted = self.to_naive().checked_add_signed(chrono::Duration::try_days(days)?)?;
        Self::from_naive(shifted).ok()
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.to_naive().weekday().into()
    }

    /// The displayed month containing this date.
    pub fn year_month(self) -> YearMonth {
        YearMonth::from(self)
    }

    /// Converts to a chrono date for arithmetic.
    pub fn to_naive(&self) -> NaiveDate {
        // fields were validated on construction and chrono covers years 1..=9999
        NaiveDate::from_ymd_opt(i32::from(self.year), u32::from(self.month), u32::from(self.day))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Converts from a chrono date.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if the year is outside 1..=9999.
    pub fn from_naive(date: NaiveDate) -> Result<Self, ParseError> {
        let year = u16::try_from(date.year()).map_err(|_| ParseError::InvalidYear(0))?;
        // chrono months and days always fit in u8
        let month = u8::try_from(date.month()).map_err(|_| ParseError::InvalidMonth(0))?;
        let day = u8::try_from(date.day()).map_err(|_| ParseError::InvalidDay { month, day: 0, year })?;
        Self::new(year, month, day)
    }

    fn parse_u16(s: &str) -> Result<u16, ParseError> {
        s.parse::<u16>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, ParseError> {
        s.parse::<u8>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

/// Day number of 1970-01-01 counted from 0001-01-01 (day 1).
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

impl FromStr for CalendarDate {
    type Err = ParseError;

    /// Parses ISO `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        match parts.as_slice() {
            [year, month, day] => Self::new(
                Self::parse_u16(year)?,
                Self::parse_u8(month)?,
                Self::parse_u8(day)?,
            ),
            _ => Err(ParseError::InvalidFormat(format!(
                "Expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {} part(s): {trimmed}",
                parts.len()
            ))),
        }
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::from_naive(value)
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> Self {
        date.to_naive()
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// An unvalidated `{year, month, day}` triple as it arrives from a caller.
///
/// Zero means "unset" for any field. Use [`DateParts::to_date`] to get a
/// real [`CalendarDate`] out of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateParts {
    pub year:  i32,
    pub month: i32,
    pub day:   i32,
}

impl DateParts {
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }

    /// True when any field is zero.
    pub const fn is_incomplete(&self) -> bool {
        self.year == 0 || self.month == 0 || self.day == 0
    }

    /// Validates into a calendar date; no overflow normalisation is applied.
    ///
    /// # Errors
    /// Returns `ParseError` naming the offending field.
    pub fn to_date(&self) -> Result<CalendarDate, ParseError> {
        let year = u16::try_from(self.year).map_err(|_| ParseError::InvalidYear(0))?;
        let month = u8::try_from(self.month).map_err(|_| ParseError::InvalidMonth(0))?;
        let day = u8::try_from(self.day).map_err(|_| ParseError::InvalidDay { month, day: 0, year })?;
        CalendarDate::new(year, month, day)
    }
}

impl From<CalendarDate> for DateParts {
    fn from(date: CalendarDate) -> Self {
        Self {
            year:  i32::from(date.year),
            month: i32::from(date.month),
            day:   i32::from(date.day),
        }
    }
}

/// Whether the triple names a real calendar day (day 31 in April does not).
pub fn is_valid_date(parts: &DateParts) -> bool {
    parts.to_date().is_ok()
}

/// Both ends valid and `start <= end`.
pub fn is_valid_range(start: &DateParts, end: &DateParts) -> bool {
    matches!((start.to_date(), end.to_date()), (Ok(a), Ok(b)) if a <= b)
}

/// Midnight timestamp of a raw triple, `None` if it is not a valid date.
pub fn to_timestamp(parts: &DateParts) -> Option<i64> {
    if parts.is_incomplete() {
        return None;
    }
    parts.to_date().ok().map(|d| d.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_new_valid_and_invalid() {
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(matches!(CalendarDate::new(2023, 2, 29), Err(ParseError::InvalidDay { .. })));
        assert!(matches!(CalendarDate::new(2024, 4, 31), Err(ParseError::InvalidDay { .. })));
        assert!(matches!(CalendarDate::new(0, 1, 1), Err(ParseError::InvalidYear(0))));
        assert!(matches!(CalendarDate::new(2024, 13, 1), Err(ParseError::InvalidMonth(13))));
        assert!(matches!(CalendarDate::new(2024, 1, 0), Err(ParseError::InvalidDay { .. })));
    }

    #[test]
    fn test_is_valid_date_rejects_overflow() {
        assert!(!is_valid_date(&DateParts::new(2024, 2, 30)));
        assert!(!is_valid_date(&DateParts::new(2024, 4, 31)));
        assert!(!is_valid_date(&DateParts::new(2024, 0, 1)));
        assert!(!is_valid_date(&DateParts::new(-5, 1, 1)));
        assert!(is_valid_date(&DateParts::new(2024, 3, 5)));
    }

    #[test]
    fn test_is_valid_range() {
        let a = DateParts::new(2024, 3, 5);
        let b = DateParts::new(2024, 3, 10);
        assert!(is_valid_range(&a, &b));
        assert!(is_valid_range(&a, &a));
        assert!(!is_valid_range(&b, &a));
        assert!(!is_valid_range(&a, &DateParts::new(2024, 2, 30)));
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(date(1970, 1, 1).timestamp(), 0);
        assert_eq!(date(1970, 1, 2).timestamp(), SECONDS_PER_DAY);
        assert_eq!(date(1969, 12, 31).timestamp(), -SECONDS_PER_DAY);
        assert_eq!(date(2024, 3, 15).timestamp(), 1_710_460_800);
        assert_eq!(to_timestamp(&DateParts::new(2024, 0, 15)), None);
        assert_eq!(to_timestamp(&DateParts::new(1970, 1, 2)), Some(SECONDS_PER_DAY));
    }

    #[test]
    fn test_add_days_across_boundaries() {
        assert_eq!(date(2024, 2, 28).add_days(1), Some(date(2024, 2, 29)));
        assert_eq!(date(2024, 2, 29).add_days(1), Some(date(2024, 3, 1)));
        assert_eq!(date(2024, 1, 1).add_days(-1), Some(date(2023, 12, 31)));
        assert_eq!(date(2024, 3, 15).add_days(-89), Some(date(2023, 12, 17)));
        assert_eq!(date(9999, 12, 31).add_days(1), None);
        assert_eq!(date(1, 1, 1).add_days(-1), None);
    }

    #[test]
    fn test_days_until() {
        assert_eq!(date(2024, 3, 1).days_until(&date(2024, 3, 10)), 9);
        assert_eq!(date(2024, 3, 10).days_until(&date(2024, 3, 1)), -9);
        assert_eq!(date(2023, 1, 1).days_until(&date(2024, 1, 1)), 365);
    }

    #[test]
    fn test_weekday() {
        assert_eq!(date(2024, 3, 15).weekday().get(), 5); // Friday
        assert_eq!(date(2024, 3, 17).weekday(), Weekday::SUNDAY);
        assert_eq!(date(1970, 1, 1).weekday().get(), 4); // Thursday
    }

    #[test]
    fn test_accessors_take_self_by_value() {
        let d = Some(date(2024, 3, 5));
        assert_eq!(d.map(CalendarDate::year), Some(2024));
        assert_eq!(d.map(CalendarDate::day), Some(5));
        assert_eq!(d.map(CalendarDate::year_month), Some(YearMonth::new(2024, 3).unwrap()));
    }

    #[test]
    fn test_ordering() {
        assert!(date(2023, 12, 31) < date(2024, 1, 1));
        assert!(date(2024, 1, 31) < date(2024, 2, 1));
        assert!(date(2024, 2, 1) < date(2024, 2, 2));
    }

    #[test]
    fn test_parse_and_display() {
        let d = "2024-03-05".parse::<CalendarDate>().unwrap();
        assert_eq!(d, date(2024, 3, 5));
        assert_eq!(d.to_string(), "2024-03-05");

        assert!(matches!("".parse::<CalendarDate>(), Err(ParseError::EmptyInput)));
        assert!(matches!("2024-03".parse::<CalendarDate>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("2024-xx-05".parse::<CalendarDate>(), Err(ParseError::InvalidFormat(_))));
        assert!(matches!("2024-02-30".parse::<CalendarDate>(), Err(ParseError::InvalidDay { .. })));
    }

    #[test]
    fn test_serde_string_format() {
        let d = date(2024, 3, 5);
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#""2024-03-05""#);
        let parsed: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, d);

        let bad: Result<CalendarDate, _> = serde_json::from_str(r#""2024-02-30""#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_date_parts_round_trip_with_naive() {
        let d = date(2024, 12, 31);
        let naive: NaiveDate = d.into();
        assert_eq!(CalendarDate::try_from(naive).unwrap(), d);
        assert_eq!(DateParts::from(d).to_date().unwrap(), d);
    }
}
