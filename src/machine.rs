//! The selection state machine: clicks, drags, hovers and key presses in,
//! normalised selections out.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid::project_hover;
use crate::{
    CalendarDate, Clock, DateParts, Grid, GridKey, Highlight, InvalidPickPolicy, KeyOutcome, Mode,
    PickerConfig, Preset, RangePosition, Selection, SelectionError, SelectionInput, SystemClock,
    YearMonth, classify, display_value, format_date, matching_preset, preset_range, project,
};

/// Which end of the range a pointer drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragEndpoint {
    Start,
    End,
}

impl DragEndpoint {
    /// The end a drag starting at `position` takes hold of.
    const fn for_position(position: RangePosition) -> Self {
        match position {
            RangePosition::End
            | RangePosition::AfterEnd
            | RangePosition::InRangeNearEnd
            | RangePosition::StartAndEnd => Self::End,
            RangePosition::Start
            | RangePosition::BeforeStart
            | RangePosition::InRangeNearStart
            | RangePosition::Invalid => Self::Start,
        }
    }
}

/// The value after an operation, and whether observers should hear about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub selection: Selection,
    /// A final pick rather than a provisional or silent update.
    pub committed: bool,
    /// Matching preset in range mode, `None` in single mode.
    pub preset:    Option<Preset>,
}

/// Owns one picker's selection and applies interactions to it.
///
/// The machine never fails: malformed dates, reversed pairs, out-of-window
/// dates and over-long ranges are degraded into a valid selection.
#[derive(Debug, Clone)]
pub struct SelectionMachine<C: Clock = SystemClock> {
    config:        PickerConfig,
    clock:         C,
    value:         Selection,
    dragging:      Option<DragEndpoint>,
    hover:         Option<CalendarDate>,
    display_month: YearMonth,
}

impl SelectionMachine<SystemClock> {
    /// A machine reading today from the host clock.
    pub fn with_system_clock(config: PickerConfig) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> SelectionMachine<C> {
    /// Creates a machine. Without a configured value it starts on today
    /// (today to today in range mode).
    ///
    /// An inverted min/max window is put back in order.
    pub fn new(mut config: PickerConfig, clock: C) -> Self {
        if let Err(err) = config.constraints.validate() {
            debug!(error = %err, "Reordered date window");
            config.constraints = config.constraints.normalized();
        }
        let today = clock.today();
        let initial = config.value.map_or_else(
            || match config.mode {
                Mode::Single => SelectionInput::from(today),
                Mode::Range => SelectionInput::from((today, today)),
            },
            SelectionInput::from,
        );

        let mut machine = Self {
            config,
            clock,
            value: Selection::EMPTY,
            dragging: None,
            hover: None,
            display_month: today.year_month(),
        };
        machine.set_value(initial, true);
        if let Some(start) = machine.value.start() {
            machine.display_month = start.year_month();
        }
        machine
    }

    pub const fn mode(&self) -> Mode {
        self.config.mode
    }

    pub const fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub const fn value(&self) -> Selection {
        self.value
    }

    pub const fn dragging(&self) -> Option<DragEndpoint> {
        self.dragging
    }

    pub const fn hover(&self) -> Option<CalendarDate> {
        self.hover
    }

    pub const fn display_month(&self) -> YearMonth {
        self.display_month
    }

    /// Today according to the injected clock.
    pub fn today(&self) -> CalendarDate {
        self.clock.today()
    }

    /// Whether the value is complete enough to apply.
    pub const fn can_apply(&self) -> bool {
        match self.config.mode {
            Mode::Single => self.value.start().is_some(),
            Mode::Range => self.value.is_complete(),
        }
    }

    /// Normalises `input` and makes it the value.
    ///
    /// `silent` marks provisional updates; only non-silent transitions are
    /// reported as committed.
    pub fn set_value(&mut self, input: impl Into<SelectionInput>, silent: bool) -> Transition {
        self.value = self.normalize(input.into());
        self.hover = None;

        let preset = self.preset_for_value();
        let matched = preset.filter(|p| *p != Preset::Custom);
        if let (Some(_), Some(start)) = (matched, self.value.start()) {
            self.display_month = start.year_month();
        }

        let transition = Transition {
            selection: self.value,
            committed: !silent,
            preset,
        };
        if silent {
            trace!(selection = %self.value, "Selection updated");
        } else {
            debug!(selection = %self.value, preset = ?preset, "Selection committed");
        }
        transition
    }

    /// Validates, clamps, orders and truncates an input into this mode's shape.
    fn normalize(&self, input: SelectionInput) -> Selection {
        let (first, second, is_pair) = match input {
            SelectionInput::Empty => return Selection::EMPTY,
            SelectionInput::Single(parts) => (Some(parts), None, false),
            SelectionInput::Pair(first, second) => (first, second, true),
        };
        let first = first.and_then(|parts| self.accept(parts));
        let second = second.and_then(|parts| self.accept(parts));

        match self.config.mode {
            Mode::Single => first.map_or(Selection::EMPTY, Selection::single),
            Mode::Range if !is_pair => {
                let err = SelectionError::InvalidRange { reason: "range mode needs a start/end pair" };
                debug!(error = %err, "Rejected selection");
                Selection::EMPTY
            },
            Mode::Range => match (first, second) {
                (Some(start), None) => Selection::single(start),
                (Some(a), Some(b)) => {
                    if a > b {
                        let err = SelectionError::InvalidRange { reason: "end before start" };
                        trace!(error = %err, "Swapping range ends");
                    }
                    let (start, end) = if a <= b { (a, b) } else { (b, a) };
                    let end = self.config.constraints.truncate_end(start, end);
                    Selection::new(Some(start), Some(end))
                },
                (None, _) => Selection::EMPTY,
            },
        }
    }

    /// A valid, clamped date, or `None` for a malformed one.
    fn accept(&self, parts: DateParts) -> Option<CalendarDate> {
        let date = match parts.to_date() {
            Ok(date) => date,
            Err(err) => {
                debug!(?parts, error = %SelectionError::from(err), "Dropped invalid date");
                return None;
            },
        };
        match self.config.constraints.check(date) {
            Ok(()) => Some(date),
            Err(err) => {
                debug!(error = %err, "Clamped date");
                Some(self.config.constraints.clamp(date))
            },
        }
    }

    fn preset_for_value(&self) -> Option<Preset> {
        match self.config.mode {
            Mode::Single => None,
            Mode::Range => Some(self.matching_preset()),
        }
    }

    /// The preset equal to the current value, `Custom` if none is.
    pub fn matching_preset(&self) -> Preset {
        match self.config.mode {
            Mode::Single => Preset::Custom,
            Mode::Range => matching_preset(&self.value, self.clock.today(), self.config.constraints.start_of_week),
        }
    }

    /// Applies a click (or Enter) on `date`.
    pub fn pick(&mut self, date: CalendarDate) -> Transition {
        if self.config.mode == Mode::Single {
            return self.set_value(Selection::single(date), false);
        }

        match self.value.dates() {
            (None, _) => self.set_value(Selection::single(date), true),
            (Some(start), None) => self.set_value(Selection::range(start, date), false),
            (Some(start), Some(end)) => {
                let position = classify(Some(start), Some(end), Some(date));
                trace!(%date, %position, "Pick on complete range");
                match position {
                    RangePosition::StartAndEnd => self.set_value(SelectionInput::Empty, true),
                    RangePosition::Start => self.set_value(Selection::single(end), true),
                    RangePosition::End => self.set_value(Selection::single(start), true),
                    RangePosition::BeforeStart | RangePosition::InRangeNearStart => {
                        self.set_value((date, end), false)
                    },
                    RangePosition::AfterEnd | RangePosition::InRangeNearEnd => {
                        self.set_value((start, date), false)
                    },
                    RangePosition::Invalid => self.reject_pick(),
                }
            },
        }
    }

    /// Like [`pick`](Self::pick) for a raw triple. A malformed date is
    /// handled by the configured [`InvalidPickPolicy`].
    pub fn pick_parts(&mut self, parts: DateParts) -> Transition {
        match parts.to_date() {
            Ok(date) => self.pick(date),
            Err(err) => {
                debug!(?parts, error = %SelectionError::from(err), "Invalid pick");
                self.reject_pick()
            },
        }
    }

    fn reject_pick(&mut self) -> Transition {
        match self.config.invalid_pick {
            InvalidPickPolicy::Clear => self.set_value(SelectionInput::Empty, true),
            InvalidPickPolicy::Ignore => self.snapshot(),
        }
    }

    /// The current value as a non-committing transition.
    fn snapshot(&self) -> Transition {
        Transition {
            selection: self.value,
            committed: false,
            preset:    self.preset_for_value(),
        }
    }

    /// Starts a pointer drag at `date` and returns the end it grabbed.
    /// Single mode has nothing to drag.
    pub fn begin_drag(&mut self, date: CalendarDate) -> Option<DragEndpoint> {
        if self.config.mode != Mode::Range {
            return None;
        }
        let endpoint = DragEndpoint::for_position(self.value.position_of(date));
        trace!(%date, ?endpoint, "Drag started");
        self.dragging = Some(endpoint);
        self.dragging
    }

    /// Moves the dragged end to `target`. Dragging past the other end swaps
    /// which end is held, so the range never shows inverted.
    ///
    /// Returns `None` when no drag is active.
    pub fn drag_to(&mut self, target: CalendarDate) -> Option<Transition> {
        let endpoint = self.dragging?;
        let (start, end) = self.value.dates();

        let (next, holding) = match (endpoint, start, end) {
            (DragEndpoint::Start, _, None) | (DragEndpoint::End, None, _) => {
                ((Some(target), None), DragEndpoint::End)
            },
            (DragEndpoint::Start, _, Some(other)) if target <= other => ((Some(target), Some(other)), endpoint),
            (DragEndpoint::Start, _, Some(other)) => ((Some(other), Some(target)), DragEndpoint::End),
            (DragEndpoint::End, Some(other), _) if other <= target => ((Some(other), Some(target)), endpoint),
            (DragEndpoint::End, Some(other), _) => ((Some(target), Some(other)), DragEndpoint::Start),
        };

        if holding != endpoint {
            debug!(%target, from = ?endpoint, to = ?holding, "Drag crossed the other end");
        }
        self.dragging = Some(holding);
        Some(self.set_value(next, true))
    }

    /// Ends the drag session. Leaves the value as it is.
    pub fn end_drag(&mut self) -> Option<DragEndpoint> {
        self.dragging.take()
    }

    /// Previews a range ending at `date` while only the start is chosen.
    ///
    /// Returns whether a preview is now active; with no start or a complete
    /// range any preview is dropped and the committed grid applies.
    pub fn hover_preview(&mut self, date: CalendarDate) -> bool {
        if self.config.mode == Mode::Range && self.value.is_partial() {
            trace!(%date, "Hover preview");
            self.hover = Some(date);
            true
        } else {
            self.hover = None;
            false
        }
    }

    pub fn clear_hover_preview(&mut self) {
        self.hover = None;
    }

    /// Empties the value and shows today's month again.
    pub fn clear(&mut self) -> Transition {
        self.dragging = None;
        self.display_month = self.clock.today().year_month();
        self.set_value(SelectionInput::Empty, true)
    }

    /// Sets the value to a preset's current range. `Custom` changes nothing.
    pub fn select_preset(&mut self, preset: Preset, silent: bool) -> Transition {
        let today = self.clock.today();
        match preset_range(preset, today, self.config.constraints.start_of_week) {
            Some(range) => self.set_value(range, silent),
            None => self.snapshot(),
        }
    }

    /// The grid for the displayed month. See [`project`] for when there is none.
    pub fn grid(&self) -> Option<Grid> {
        self.grid_for(self.display_month)
    }

    /// The grid for any month, with the hover preview overlaid if active.
    pub fn grid_for(&self, month: YearMonth) -> Option<Grid> {
        let start_of_week = self.config.constraints.start_of_week;
        match (self.hover, self.value.dates()) {
            (Some(hover), (Some(anchor), None)) if self.config.mode == Mode::Range => {
                project_hover(month, anchor, hover, start_of_week)
            },
            _ => project(month, &self.value, self.config.mode, start_of_week),
        }
    }

    /// Shows another month.
    pub fn show_month(&mut self, month: YearMonth) {
        self.display_month = month;
    }

    /// Advances the displayed month, returning the new one.
    pub fn next_month(&mut self) -> YearMonth {
        if let Some(next) = self.display_month.next() {
            self.display_month = next;
        }
        self.display_month
    }

    /// Steps the displayed month back, returning the new one.
    pub fn prev_month(&mut self) -> YearMonth {
        if let Some(prev) = self.display_month.prev() {
            self.display_month = prev;
        }
        self.display_month
    }

    /// Applies a key press with the highlight at `highlight`.
    ///
    /// Moving the highlight also drives the hover preview; crossing a grid
    /// edge displays the neighbouring month.
    pub fn press_key(&mut self, highlight: Highlight, key: GridKey) -> KeyOutcome {
        let start_of_week = self.config.constraints.start_of_week;
        match key {
            GridKey::Select => highlight
                .date(start_of_week)
                .map_or(KeyOutcome::Unchanged, |date| KeyOutcome::Picked(self.pick(date))),
            GridKey::Escape => KeyOutcome::Dismissed,
            GridKey::Left | GridKey::Right | GridKey::Up | GridKey::Down => {
                let Some(next) = highlight.step(key) else {
                    return KeyOutcome::Unchanged;
                };
                if let Some(date) = next.date(start_of_week) {
                    self.hover_preview(date);
                }
                if next.month == highlight.month {
                    KeyOutcome::Moved(next)
                } else {
                    self.display_month = next.month;
                    KeyOutcome::MonthChanged(next)
                }
            },
        }
    }

    /// The value formatted with `pattern`: the start (or single date) and,
    /// in range mode, the end.
    pub fn format(&self, pattern: &str) -> (String, Option<String>) {
        let locale = &self.config.locale;
        let first = format_date(self.value.start(), pattern, locale);
        match self.config.mode {
            Mode::Single => (first, None),
            Mode::Range => (first, Some(format_date(self.value.end(), pattern, locale))),
        }
    }

    /// Text for the value field, using the configured pattern and placeholder.
    pub fn display_value(&self) -> String {
        display_value(
            &self.value,
            self.config.mode,
            self.preset_for_value(),
            self.config.format_pattern(),
            &self.config.locale,
            self.config.placeholder_text(),
        )
    }
}
