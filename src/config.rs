//! Picker configuration, deserialisable from JSON or any other serde format.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CalendarDate, DEFAULT_FORMAT, Locale, Selection, SelectionError, Weekday, prelude::*};

/// Whether the picker selects one date or a range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    #[display(fmt = "single")]
    Single,
    #[display(fmt = "range")]
    Range,
}

/// What a pick with a malformed date does to a complete range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPickPolicy {
    /// Drop the whole selection.
    #[default]
    Clear,
    /// Keep the selection as it was.
    Ignore,
}

/// Limits on what can be selected. Fixed for the lifetime of a picker.
///
/// Deserialising rejects a `minDate` later than `maxDate`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ConstraintsInput")]
pub struct Constraints {
    pub min_date:       Option<CalendarDate>,
    pub max_date:       Option<CalendarDate>,
    /// Longest allowed range, counting both ends.
    pub max_range_days: Option<NonZeroU32>,
    pub start_of_week:  Weekday,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConstraintsInput {
    min_date:       Option<CalendarDate>,
    max_date:       Option<CalendarDate>,
    max_range_days: Option<NonZeroU32>,
    start_of_week:  Weekday,
}

impl TryFrom<ConstraintsInput> for Constraints {
    type Error = SelectionError;

    fn try_from(input: ConstraintsInput) -> Result<Self, Self::Error> {
        let constraints = Self {
            min_date:       input.min_date,
            max_date:       input.max_date,
            max_range_days: input.max_range_days,
            start_of_week:  input.start_of_week,
        };
        constraints.validate()?;
        Ok(constraints)
    }
}

impl Constraints {
    /// Checks that the min/max window is not inverted.
    ///
    /// # Errors
    /// Returns `SelectionError::InvalidRange` if `min_date` is after `max_date`.
    pub fn validate(&self) -> Result<(), SelectionError> {
        match (self.min_date, self.max_date) {
            (Some(min), Some(max)) if min > max => Err(SelectionError::InvalidRange {
                reason: "minDate is after maxDate",
            }),
            _ => Ok(()),
        }
    }

    /// The same limits with an inverted min/max window put back in order.
    pub fn normalized(self) -> Self {
        match (self.min_date, self.max_date) {
            (Some(min), Some(max)) if min > max => Self {
                min_date: Some(max),
                max_date: Some(min),
                ..self
            },
            _ => self,
        }
    }

    /// Reports whether `date` lies inside the min/max window.
    ///
    /// # Errors
    /// Returns `SelectionError::OutOfConstraint` with the nearest allowed date.
    pub fn check(&self, date: CalendarDate) -> Result<(), SelectionError> {
        let nearest = self.clamp(date);
        if nearest == date {
            Ok(())
        } else {
            Err(SelectionError::OutOfConstraint { date, nearest })
        }
    }

    /// Pulls `date` into the min/max window. Below the minimum becomes the
    /// minimum, above the maximum becomes the maximum.
    pub fn clamp(&self, date: CalendarDate) -> CalendarDate {
        if let Some(min) = self.min_date.filter(|min| date < *min) {
            return min;
        }
        if let Some(max) = self.max_date.filter(|max| date > *max) {
            return max;
        }
        date
    }

    /// Reports whether `[start, end]` fits within `max_range_days`.
    ///
    /// # Errors
    /// Returns `SelectionError::RangeTooLong` if it does not.
    pub fn check_span(&self, start: CalendarDate, end: CalendarDate) -> Result<(), SelectionError> {
        let Some(max) = self.max_range_days else {
            return Ok(());
        };
        let days = start.days_until(&end) + 1;
        if days > i64::from(max.get()) {
            Err(SelectionError::RangeTooLong { days, max: max.get() })
        } else {
            Ok(())
        }
    }

    /// Cuts `end` back to `start + (max_range_days - 1)` when the range is too long.
    pub fn truncate_end(&self, start: CalendarDate, end: CalendarDate) -> CalendarDate {
        match (self.check_span(start, end), self.max_range_days) {
            (Err(err), Some(max)) => {
                let truncated = start
                    .add_days(i64::from(max.get()) - 1)
                    .unwrap_or(end);
                debug!(%start, %end, %truncated, error = %err, "Truncated range end");
                truncated
            },
            _ => end,
        }
    }
}

/// Everything a picker needs to know up front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PickerConfig {
    pub mode:         Mode,
    #[serde(flatten)]
    pub constraints:  Constraints,
    /// Display pattern, see [`crate::format_date`].
    pub format:       Option<String>,
    pub placeholder:  Option<String>,
    pub locale:       Locale,
    pub invalid_pick: InvalidPickPolicy,
    /// Starting value; defaults to today (and today/today in range mode).
    pub value:        Option<Selection>,
}

impl PickerConfig {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn range() -> Self {
        Self {
            mode: Mode::Range,
            ..Self::default()
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_value(mut self, value: Selection) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_invalid_pick(mut self, policy: InvalidPickPolicy) -> Self {
        self.invalid_pick = policy;
        self
    }

    /// The display pattern, falling back to `DEFAULT_FORMAT`.
    pub fn format_pattern(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    pub fn placeholder_text(&self) -> &str {
        self.placeholder.as_deref().unwrap_or_default()
    }
}
