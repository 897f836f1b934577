//! Month and year switching: dropdown contents and the one-shot gate that
//! keeps overlapping month transitions from stacking up.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::RangeInclusive;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::{
    CalendarDate, Constraints, DECEMBER, JANUARY, MAX_YEAR, YEARS_AFTER_TODAY, YEARS_BEFORE_TODAY,
    YearMonth,
};

type Callback = Box<dyn FnOnce()>;

/// Allows one month transition at a time.
///
/// A transition is started with [`begin`](Self::begin), which hands back a
/// [`CompletionToken`]. Until that token completes, further transitions are
/// refused.
#[derive(Debug, Clone, Default)]
pub struct NavigationGate {
    pending: Rc<Cell<bool>>,
}

impl NavigationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transition is running and has not completed.
    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    /// Starts a transition, `None` while another is still pending.
    ///
    /// `on_complete` runs when the token first completes.
    pub fn begin(&self, on_complete: impl FnOnce() + 'static) -> Option<CompletionToken> {
        if self.pending.replace(true) {
            trace!("Navigation refused, transition pending");
            return None;
        }
        let callback: Callback = Box::new(on_complete);
        Some(CompletionToken {
            pending:  Rc::clone(&self.pending),
            callback: Rc::new(RefCell::new(Some(callback))),
        })
    }
}

/// Finishes one transition. Clones share the same one-shot state, so
/// whichever signal arrives first (animation end, fallback timer) wins and
/// the rest are no-ops.
#[derive(Clone)]
pub struct CompletionToken {
    pending:  Rc<Cell<bool>>,
    callback: Rc<RefCell<Option<Callback>>>,
}

impl CompletionToken {
    /// Runs the callback and reopens the gate. Returns `false` if this
    /// transition already completed.
    pub fn complete(&self) -> bool {
        let Some(callback) = self.callback.borrow_mut().take() else {
            return false;
        };
        self.pending.set(false);
        debug!("Navigation completed");
        callback();
        true
    }

    pub fn is_spent(&self) -> bool {
        self.callback.borrow().is_none()
    }
}

impl fmt::Debug for CompletionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionToken")
            .field("spent", &self.is_spent())
            .finish_non_exhaustive()
    }
}

/// Months of `year` for the month dropdown, each with whether it may be
/// chosen under `constraints`.
pub fn month_options(year: u16, constraints: &Constraints) -> Vec<(u8, bool)> {
    let lowest = constraints.min_date.map(CalendarDate::year_month);
    let highest = constraints.max_date.map(CalendarDate::year_month);
    (JANUARY..=DECEMBER)
        .map(|month| {
            let allowed = YearMonth::new(year, month).is_ok_and(|ym| {
                lowest.is_none_or(|low| ym >= low) && highest.is_none_or(|high| ym <= high)
            });
            (month, allowed)
        })
        .collect()
}

/// Years for the year dropdown: from the minimum date's year (or a century
/// back) to the maximum date's year (or twenty years on).
pub fn year_options(constraints: &Constraints, today: CalendarDate) -> RangeInclusive<u16> {
    let first = constraints
        .min_date
        .map_or_else(|| today.year().saturating_sub(YEARS_BEFORE_TODAY).max(1), CalendarDate::year);
    let last = constraints
        .max_date
        .map_or_else(|| today.year().saturating_add(YEARS_AFTER_TODAY).min(MAX_YEAR), CalendarDate::year);
    first..=last
}

/// The month shown after picking `year` from the dropdown while `current`
/// is displayed. The month is kept but pulled into the min/max window. An
/// out-of-range year leaves `current` displayed.
pub fn year_switch(current: YearMonth, year: u16, constraints: &Constraints) -> YearMonth {
    let Ok(target) = current.with_year(year) else {
        return current;
    };
    if let Some(low) = constraints.min_date.map(CalendarDate::year_month).filter(|low| target < *low) {
        return low;
    }
    if let Some(high) = constraints.max_date.map(CalendarDate::year_month).filter(|high| target > *high) {
        return high;
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, month};

    fn window() -> Constraints {
        Constraints {
            min_date: Some(date(2022, 4, 10)),
            max_date: Some(date(2024, 9, 1)),
            ..Constraints::default()
        }
    }

    #[test]
    fn test_gate_refuses_while_pending() {
        let gate = NavigationGate::new();
        let token = gate.begin(|| {}).unwrap();
        assert!(gate.is_pending());
        assert!(gate.begin(|| {}).is_none());

        assert!(token.complete());
        assert!(!gate.is_pending());
        assert!(gate.begin(|| {}).is_some());
    }

    #[test]
    fn test_token_completes_once() {
        let runs = Rc::new(Cell::new(0));
        let gate = NavigationGate::new();
        let counter = Rc::clone(&runs);
        let token = gate.begin(move || counter.set(counter.get() + 1)).unwrap();
        let fallback = token.clone();

        assert!(token.complete());
        assert!(!fallback.complete());
        assert!(!token.complete());
        assert!(fallback.is_spent());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_stale_token_does_not_reopen_new_transition() {
        let gate = NavigationGate::new();
        let first = gate.begin(|| {}).unwrap();
        first.complete();
        let _second = gate.begin(|| {}).unwrap();

        assert!(!first.complete());
        assert!(gate.is_pending());
    }

    #[test]
    fn test_month_options() {
        let c = window();
        let allowed = |year| -> Vec<u8> {
            month_options(year, &c)
                .into_iter()
                .filter_map(|(m, ok)| ok.then_some(m))
                .collect()
        };
        assert_eq!(allowed(2022), (4..=12).collect::<Vec<_>>());
        assert_eq!(allowed(2023).len(), 12);
        assert_eq!(allowed(2024), (1..=9).collect::<Vec<_>>());
        assert!(allowed(2025).is_empty());
        assert_eq!(month_options(2030, &Constraints::default()).len(), 12);
    }

    #[test]
    fn test_year_options() {
        let today = date(2024, 3, 15);
        assert_eq!(year_options(&window(), today), 2022..=2024);
        assert_eq!(year_options(&Constraints::default(), today), 1924..=2044);
        assert_eq!(year_options(&Constraints::default(), date(50, 1, 1)), 1..=70);
        assert_eq!(year_options(&Constraints::default(), date(9990, 1, 1)), 9890..=9999);
    }

    #[test]
    fn test_year_switch_clamps_month() {
        let c = window();
        assert_eq!(year_switch(month(2023, 1), 2022, &c), month(2022, 4));
        assert_eq!(year_switch(month(2023, 11), 2024, &c), month(2024, 9));
        assert_eq!(year_switch(month(2023, 6), 2024, &c), month(2024, 6));
        assert_eq!(year_switch(month(2024, 2), 2023, &Constraints::default()), month(2023, 2));
    }
}
