//! Shared fixtures for unit tests.

use crate::{CalendarDate, Constraints, FixedClock, Selection, Weekday, YearMonth};

pub fn date(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::new(year, month, day).unwrap()
}

pub fn month(year: u16, month: u8) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

pub fn range(start: (u16, u8, u8), end: (u16, u8, u8)) -> Selection {
    Selection::new(Some(date(start.0, start.1, start.2)), Some(date(end.0, end.1, end.2)))
}

/// Friday 2024-03-15.
pub fn friday_clock() -> FixedClock {
    FixedClock::new(date(2024, 3, 15))
}

pub fn monday_constraints() -> Constraints {
    Constraints {
        start_of_week: Weekday::MONDAY,
        ..Constraints::default()
    }
}
