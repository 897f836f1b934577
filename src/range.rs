use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DateParts, ParseError, prelude::*};

/// The selected value of a picker.
///
/// Single mode keeps its date in `start` and never sets `end`. Range mode
/// holds an ordered pair where either end may be unset: `(None, None)` is
/// empty, `(Some, None)` is a range waiting for its end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    start: Option<CalendarDate>,
    end:   Option<CalendarDate>,
}

/// Errors describing why an input did not survive normalisation untouched.
///
/// The selection engine never returns these to its caller. It degrades the
/// input instead and reports the reason through `tracing`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// A date that is not a real calendar day.
    #[error(transparent)]
    InvalidDate(#[from] ParseError),

    /// End before start, or a pair was required and not given.
    #[error("Invalid range: {reason}")]
    InvalidRange { reason: &'static str },

    /// A date outside the min/max window.
    #[error("Date {date} is outside the allowed window, nearest allowed is {nearest}")]
    OutOfConstraint { date: CalendarDate, nearest: CalendarDate },

    /// A range spanning more days than allowed.
    #[error("Range of {days} days exceeds the limit of {max} days")]
    RangeTooLong { days: i64, max: u32 },
}

/// What a caller hands to `set_value` before normalisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionInput {
    /// Clear the value.
    Empty,
    /// One date. Range mode rejects it since it is not a pair.
    Single(DateParts),
    /// A start/end pair, either side possibly missing.
    Pair(Option<DateParts>, Option<DateParts>),
}

/// Where a date falls relative to a (possibly partial) range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePosition {
    #[display(fmt = "start")]
    Start,
    #[display(fmt = "end")]
    End,
    /// The range is a single day and the date is that day.
    #[display(fmt = "start_and_end")]
    #[serde(rename = "start_and_end")]
    StartAndEnd,
    #[display(fmt = "before-start")]
    BeforeStart,
    #[display(fmt = "after-end")]
    AfterEnd,
    /// Strictly inside, at least as close to the start as to the end.
    #[display(fmt = "in-range-near-start")]
    InRangeNearStart,
    /// Strictly inside, closer to the end.
    #[display(fmt = "in-range-near-end")]
    InRangeNearEnd,
    /// No start, or no date to classify.
    #[display(fmt = "invalid")]
    Invalid,
}

impl RangePosition {
    /// Strictly between start and end.
    pub const fn is_interior(self) -> bool {
        matches!(self, Self::InRangeNearStart | Self::InRangeNearEnd)
    }
}

/// Classifies `target` against the range `[start, end]`.
///
/// With only a start, anything after it counts as `AfterEnd`. Interior
/// dates tie-break towards the start: equal distance is `InRangeNearStart`.
pub fn classify(
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
    target: Option<CalendarDate>,
) -> RangePosition {
    let (Some(start), Some(target)) = (start, target) else {
        return RangePosition::Invalid;
    };

    let Some(end) = end else {
        return if target == start {
            RangePosition::Start
        } else if target < start {
            RangePosition::BeforeStart
        } else {
            RangePosition::AfterEnd
        };
    };

    if target == start && target == end {
        return RangePosition::StartAndEnd;
    }
    if target == start {
        return RangePosition::Start;
    }
    if target == end {
        return RangePosition::End;
    }
    if target < start {
        return RangePosition::BeforeStart;
    }
    if target > end {
        return RangePosition::AfterEnd;
    }

    let to_start = start.days_until(&target);
    let to_end = target.days_until(&end);
    if to_start <= to_end {
        RangePosition::InRangeNearStart
    } else {
        RangePosition::InRangeNearEnd
    }
}

impl Selection {
    /// An empty selection.
    pub const EMPTY: Self = Self { start: None, end: None };

    /// Builds a selection from raw ends. No ordering is enforced here;
    /// the selection machine is what keeps ranges ordered.
    pub const fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        Self { start, end }
    }

    /// A single date, or a range that has a start and no end yet.
    pub const fn single(date: CalendarDate) -> Self {
        Self { start: Some(date), end: None }
    }

    /// An ordered range; swaps the ends if given backwards.
    pub fn range(a: CalendarDate, b: CalendarDate) -> Self {
        if a <= b {
            Self { start: Some(a), end: Some(b) }
        } else {
            Self { start: Some(b), end: Some(a) }
        }
    }

    pub const fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub const fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    /// Returns both ends as a tuple
    pub const fn dates(&self) -> (Option<CalendarDate>, Option<CalendarDate>) {
        (self.start, self.end)
    }

    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both ends are set.
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// A start is set but the end is still open.
    pub const fn is_partial(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    /// Where `target` falls relative to this selection.
    pub fn position_of(&self, target: CalendarDate) -> RangePosition {
        classify(self.start, self.end, Some(target))
    }

    /// Inclusive length in days of a complete range.
    pub fn span_days(&self) -> Option<i64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(start.days_until(&end) + 1),
            _ => None,
        }
    }
}

impl From<CalendarDate> for Selection {
    fn from(date: CalendarDate) -> Self {
        Self::single(date)
    }
}

impl From<(CalendarDate, CalendarDate)> for Selection {
    fn from((a, b): (CalendarDate, CalendarDate)) -> Self {
        Self::range(a, b)
    }
}

impl fmt::Display for Selection {
    /// ISO interval style, an unset end renders empty: `2024-03-05/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{start}")?;
        }
        f.write_str("/")?;
        if let Some(end) = self.end {
            write!(f, "{end}")?;
        }
        Ok(())
    }
}

impl From<CalendarDate> for SelectionInput {
    fn from(date: CalendarDate) -> Self {
        Self::Single(date.into())
    }
}

impl From<Option<CalendarDate>> for SelectionInput {
    fn from(date: Option<CalendarDate>) -> Self {
        date.map_or(Self::Empty, Self::from)
    }
}

impl From<(CalendarDate, CalendarDate)> for SelectionInput {
    fn from((start, end): (CalendarDate, CalendarDate)) -> Self {
        Self::Pair(Some(start.into()), Some(end.into()))
    }
}

impl From<(Option<CalendarDate>, Option<CalendarDate>)> for SelectionInput {
    fn from((start, end): (Option<CalendarDate>, Option<CalendarDate>)) -> Self {
        Self::Pair(start.map(DateParts::from), end.map(DateParts::from))
    }
}

impl From<Selection> for SelectionInput {
    /// Always a pair, so a partial range stays a partial range.
    fn from(selection: Selection) -> Self {
        selection.dates().into()
    }
}

impl From<(DateParts, DateParts)> for SelectionInput {
    fn from((start, end): (DateParts, DateParts)) -> Self {
        Self::Pair(Some(start), Some(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range};

    #[test]
    fn test_classify_endpoints() {
        let a = date(2024, 3, 5);
        let b = date(2024, 3, 10);
        assert_eq!(classify(Some(a), Some(b), Some(a)), RangePosition::Start);
        assert_eq!(classify(Some(a), Some(b), Some(b)), RangePosition::End);
        assert_eq!(classify(Some(a), Some(a), Some(a)), RangePosition::StartAndEnd);
    }

    #[test]
    fn test_classify_outside() {
        let a = date(2024, 3, 5);
        let b = date(2024, 3, 10);
        assert_eq!(classify(Some(a), Some(b), Some(date(2024, 3, 4))), RangePosition::BeforeStart);
        assert_eq!(classify(Some(a), Some(b), Some(date(2024, 3, 11))), RangePosition::AfterEnd);
        assert_eq!(classify(Some(a), Some(b), Some(date(2023, 3, 7))), RangePosition::BeforeStart);
    }

    #[test]
    fn test_classify_partial_range() {
        let a = date(2024, 3, 5);
        assert_eq!(classify(Some(a), None, Some(a)), RangePosition::Start);
        assert_eq!(classify(Some(a), None, Some(date(2024, 3, 1))), RangePosition::BeforeStart);
        assert_eq!(classify(Some(a), None, Some(date(2024, 3, 9))), RangePosition::AfterEnd);
    }

    #[test]
    fn test_classify_invalid() {
        let a = date(2024, 3, 5);
        assert_eq!(classify(None, Some(a), Some(a)), RangePosition::Invalid);
        assert_eq!(classify(Some(a), Some(a), None), RangePosition::Invalid);
        assert_eq!(classify(None, None, None), RangePosition::Invalid);
    }

    #[test]
    fn test_classify_interior_tie_break() {
        let a = date(2024, 3, 1);
        let b = date(2024, 3, 11);
        // every interior day: near start iff distance to start <= distance to end
        for day in 2..=10 {
            let t = date(2024, 3, day);
            let expected = if (day - 1) <= (11 - day) {
                RangePosition::InRangeNearStart
            } else {
                RangePosition::InRangeNearEnd
            };
            assert_eq!(classify(Some(a), Some(b), Some(t)), expected, "day {day}");
        }
        // exact midpoint goes to the start
        assert_eq!(classify(Some(a), Some(b), Some(date(2024, 3, 6))), RangePosition::InRangeNearStart);
    }

    #[test]
    fn test_classify_interior_across_months() {
        let a = date(2024, 1, 30);
        let b = date(2024, 2, 3);
        assert_eq!(classify(Some(a), Some(b), Some(date(2024, 2, 1))), RangePosition::InRangeNearStart);
        assert_eq!(classify(Some(a), Some(b), Some(date(2024, 2, 2))), RangePosition::InRangeNearEnd);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(RangePosition::StartAndEnd.to_string(), "start_and_end");
        assert_eq!(RangePosition::InRangeNearEnd.to_string(), "in-range-near-end");
        assert_eq!(
            serde_json::to_string(&RangePosition::BeforeStart).unwrap(),
            r#""before-start""#
        );
        assert_eq!(
            serde_json::to_string(&RangePosition::StartAndEnd).unwrap(),
            r#""start_and_end""#
        );
    }

    #[test]
    fn test_selection_range_orders_ends() {
        let s = Selection::range(date(2024, 3, 10), date(2024, 3, 5));
        assert_eq!(s.dates(), (Some(date(2024, 3, 5)), Some(date(2024, 3, 10))));
        assert_eq!(s.span_days(), Some(6));
    }

    #[test]
    fn test_selection_shapes() {
        assert!(Selection::EMPTY.is_empty());
        assert!(Selection::single(date(2024, 3, 5)).is_partial());
        assert!(range((2024, 3, 5), (2024, 3, 6)).is_complete());
        assert_eq!(Selection::single(date(2024, 3, 5)).span_days(), None);
    }

    #[test]
    fn test_selection_display() {
        assert_eq!(range((2024, 3, 5), (2024, 3, 10)).to_string(), "2024-03-05/2024-03-10");
        assert_eq!(Selection::single(date(2024, 3, 5)).to_string(), "2024-03-05/");
        assert_eq!(Selection::EMPTY.to_string(), "/");
    }

    #[test]
    fn test_selection_serde() {
        let s = range((2024, 3, 5), (2024, 3, 10));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"start":"2024-03-05","end":"2024-03-10"}"#);
        let parsed: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, s);
    }

    #[test]
    fn test_selection_error_messages() {
        let err = SelectionError::RangeTooLong { days: 12, max: 7 };
        assert_eq!(err.to_string(), "Range of 12 days exceeds the limit of 7 days");

        let err: SelectionError = ParseError::InvalidMonth(13).into();
        assert!(err.to_string().contains("Invalid month: 13"));
    }
}
