//! Source of "today".

use chrono::Local;

use crate::CalendarDate;

/// Supplies the current calendar date.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Reads the host's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        // the host clock is always within chrono's and our year range in practice;
        // fall back to the epoch rather than panic if it is not
        CalendarDate::from_naive(Local::now().date_naive())
            .unwrap_or(CalendarDate::from_valid(1970, 1, 1))
    }
}

/// A clock stuck on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(CalendarDate);

impl FixedClock {
    pub const fn new(today: CalendarDate) -> Self {
        Self(today)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CalendarDate {
        (**self).today()
    }
}
