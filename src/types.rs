use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAYS_PER_WEEK, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, JANUARY, LEAP_YEAR_CYCLE, MAX_MONTH, MAX_YEAR, MIN_DAY,
};
use crate::{CalendarDate, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weekday names accepted for a first-day-of-week, Sunday first.
const WEEKDAY_PREFIXES: [&str; DAYS_PER_WEEK] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// A day of the week counted from Sunday (`0`) to Saturday (`6`).
///
/// Used both as the weekday of a date and as the configurable first
/// column of a calendar grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "WeekdayInput", into = "u8")]
pub struct Weekday(u8);

impl Weekday {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);
    pub const SATURDAY: Self = Self(6);

    /// Creates a weekday from its Sunday-based index.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidWeekday` if the index is greater than 6.
    pub fn new(index: u8) -> Result<Self, ParseError> {
        if usize::from(index) >= DAYS_PER_WEEK {
            return Err(ParseError::InvalidWeekday(index));
        }
        Ok(Self(index))
    }

    /// Looks a weekday up by name. Only the first three letters count,
    /// case-insensitively, so `"Monday"`, `"mon"` and `" MONTAG"` all match.
    pub fn from_name(name: &str) -> Option<Self> {
        let prefix: String = name.trim().chars().take(3).collect::<String>().to_lowercase();
        WEEKDAY_PREFIXES
            .iter()
            .position(|p| *p == prefix)
            .and_then(|idx| u8::try_from(idx).ok())
            .map(Self)
    }

    /// Returns the Sunday-based index.
    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the Sunday-based index as a `usize`, handy for indexing name tables.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Column this weekday occupies in a grid whose first column is `start_of_week`.
    pub const fn column(self, start_of_week: Self) -> usize {
        (self.0 as usize + DAYS_PER_WEEK - start_of_week.0 as usize) % DAYS_PER_WEEK
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        // num_days_from_sunday is always 0..=6
        Self(u8::try_from(day.num_days_from_sunday()).unwrap_or_default())
    }
}

impl From<Weekday> for u8 {
    fn from(day: Weekday) -> Self {
        day.0
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(WEEKDAY_PREFIXES[self.index()])
    }
}

/// Loose first-day-of-week input: an index or a weekday name.
#[derive(Deserialize)]
#[serde(untagged)]
enum WeekdayInput {
    Index(i64),
    Name(String),
}

impl From<WeekdayInput> for Weekday {
    /// Anything unrecognised falls back to Sunday.
    fn from(input: WeekdayInput) -> Self {
        match input {
            WeekdayInput::Index(idx) => u8::try_from(idx)
                .ok()
                .and_then(|idx| Self::new(idx).ok())
                .unwrap_or_default(),
            WeekdayInput::Name(name) => Self::from_name(&name).unwrap_or_default(),
        }
    }
}

/// A displayed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    year:  u16,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` or `ParseError::InvalidMonth` when out of range.
    pub fn new(year: u16, month: u8) -> Result<Self, ParseError> {
        if year == 0 || year > MAX_YEAR {
            return Err(ParseError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(ParseError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    pub const fn year(self) -> u16 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }

    /// Number of days in this month.
    pub const fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// The 1st of this month.
    pub const fn first_day(self) -> CalendarDate {
        CalendarDate::from_valid(self.year, self.month, MIN_DAY)
    }

    /// The last day of this month.
    pub const fn last_day(self) -> CalendarDate {
        CalendarDate::from_valid(self.year, self.month, self.days())
    }

    /// The following month, or `None` past December `MAX_YEAR`.
    pub const fn next(self) -> Option<Self> {
        if self.month == DECEMBER {
            if self.year >= MAX_YEAR {
                None
            } else {
                Some(Self { year: self.year + 1, month: JANUARY })
            }
        } else {
            Some(Self { year: self.year, month: self.month + 1 })
        }
    }

    /// The preceding month, or `None` before January of year 1.
    pub const fn prev(self) -> Option<Self> {
        if self.month == JANUARY {
            if self.year <= 1 {
                None
            } else {
                Some(Self { year: self.year - 1, month: DECEMBER })
            }
        } else {
            Some(Self { year: self.year, month: self.month - 1 })
        }
    }

    /// Same month number in another year.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidYear` if `year` is out of range.
    pub fn with_year(self, year: u16) -> Result<Self, ParseError> {
        Self::new(year, self.month)
    }
}

impl From<CalendarDate> for YearMonth {
    fn from(date: CalendarDate) -> Self {
        Self {
            year:  date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// Helper functions

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
