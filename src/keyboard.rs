//! Arrow-key movement of the highlighted day.

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DAYS_PER_WEEK, GRID_CELLS, Transition, Weekday, YearMonth};

/// Keys the day grid reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GridKey {
    Left,
    Right,
    Up,
    Down,
    /// Enter or Space.
    Select,
    Escape,
}

impl GridKey {
    /// Maps a DOM-style key name (`"ArrowLeft"`, `"Enter"`, `" "`, ...) case-insensitively.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "arrowleft" => Some(Self::Left),
            "arrowright" => Some(Self::Right),
            "arrowup" => Some(Self::Up),
            "arrowdown" => Some(Self::Down),
            "enter" | " " => Some(Self::Select),
            "escape" => Some(Self::Escape),
            _ => None,
        }
    }
}

/// The keyboard-highlighted cell of a displayed month's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    pub month: YearMonth,
    /// Cell index, `0..GRID_CELLS`.
    pub index: usize,
}

impl Highlight {
    /// The top-left cell of `month`.
    pub const fn first(month: YearMonth) -> Self {
        Self { month, index: 0 }
    }

    /// The date under the highlight.
    pub fn date(&self, start_of_week: Weekday) -> Option<CalendarDate> {
        let first = self.month.first_day();
        let leading = first.weekday().column(start_of_week);
        let offset = i64::try_from(self.index).ok()? - i64::try_from(leading).ok()?;
        first.add_days(offset)
    }

    /// Where the highlight goes for a movement key, `None` if it stays put.
    ///
    /// Left and Right walk off the grid edges into the neighbouring month,
    /// landing on its last or first cell. Up and Down stop at the edges.
    pub fn step(self, key: GridKey) -> Option<Self> {
        match key {
            GridKey::Right if self.index + 1 < GRID_CELLS => Some(Self { index: self.index + 1, ..self }),
            GridKey::Right => self.month.next().map(Self::first),
            GridKey::Left if self.index > 0 => Some(Self { index: self.index - 1, ..self }),
            GridKey::Left => self.month.prev().map(|month| Self {
                month,
                index: GRID_CELLS - 1,
            }),
            GridKey::Up => self
                .index
                .checked_sub(DAYS_PER_WEEK)
                .map(|index| Self { index, ..self }),
            GridKey::Down if self.index + DAYS_PER_WEEK < GRID_CELLS => Some(Self {
                index: self.index + DAYS_PER_WEEK,
                ..self
            }),
            GridKey::Down | GridKey::Select | GridKey::Escape => None,
        }
    }
}

/// Result of a key press on the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Highlight moved within the displayed month.
    Moved(Highlight),
    /// Highlight crossed into another month, which is now displayed.
    MonthChanged(Highlight),
    /// The highlighted day was picked.
    Picked(Transition),
    /// The picker should close.
    Dismissed,
    /// Nothing happened.
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, month};

    #[test]
    fn test_step_within_grid() {
        let h = Highlight { month: month(2024, 3), index: 10 };
        assert_eq!(h.step(GridKey::Right).unwrap().index, 11);
        assert_eq!(h.step(GridKey::Left).unwrap().index, 9);
        assert_eq!(h.step(GridKey::Up).unwrap().index, 3);
        assert_eq!(h.step(GridKey::Down).unwrap().index, 17);
        assert_eq!(h.step(GridKey::Select), None);
    }

    #[test]
    fn test_step_vertical_edges() {
        let top = Highlight { month: month(2024, 3), index: 6 };
        assert_eq!(top.step(GridKey::Up), None);
        let bottom = Highlight { month: month(2024, 3), index: 35 };
        assert_eq!(bottom.step(GridKey::Down), None);
        let last_row = Highlight { month: month(2024, 3), index: 34 };
        assert_eq!(last_row.step(GridKey::Down).unwrap().index, 41);
    }

    #[test]
    fn test_step_horizontal_rolls_month() {
        let last = Highlight { month: month(2024, 12), index: 41 };
        assert_eq!(last.step(GridKey::Right), Some(Highlight { month: month(2025, 1), index: 0 }));

        let first = Highlight::first(month(2024, 1));
        assert_eq!(first.step(GridKey::Left), Some(Highlight { month: month(2023, 12), index: 41 }));
    }

    #[test]
    fn test_highlight_date() {
        // March 2024 starts on a Friday
        let h = Highlight::first(month(2024, 3));
        assert_eq!(h.date(Weekday::MONDAY), Some(date(2024, 2, 26)));
        assert_eq!(h.date(Weekday::SUNDAY), Some(date(2024, 2, 25)));
        let h = Highlight { month: month(2024, 3), index: 41 };
        assert_eq!(h.date(Weekday::MONDAY), Some(date(2024, 4, 7)));
    }

    #[test]
    fn test_key_names() {
        assert_eq!(GridKey::from_key_name("ArrowLeft"), Some(GridKey::Left));
        assert_eq!(GridKey::from_key_name("ENTER"), Some(GridKey::Select));
        assert_eq!(GridKey::from_key_name(" "), Some(GridKey::Select));
        assert_eq!(GridKey::from_key_name("Escape"), Some(GridKey::Escape));
        assert_eq!(GridKey::from_key_name("Tab"), None);
    }
}
