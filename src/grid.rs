//! Six-week month grid with per-day selection state.

use serde::{Deserialize, Serialize};

use crate::{
    CalendarDate, DAYS_PER_WEEK, GRID_CELLS, Mode, RangePosition, Selection, Weekday, YearMonth,
};

/// How a day renders given the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellState {
    #[default]
    None,
    /// The chosen day in single mode.
    Selected,
    RangeStart,
    RangeEnd,
    /// A one-day range: both start and end.
    RangeStartAndEnd,
    InRange,
}

impl CellState {
    fn from_position(position: RangePosition) -> Self {
        match position {
            RangePosition::Start => Self::RangeStart,
            RangePosition::End => Self::RangeEnd,
            RangePosition::StartAndEnd => Self::RangeStartAndEnd,
            RangePosition::InRangeNearStart | RangePosition::InRangeNearEnd => Self::InRange,
            RangePosition::BeforeStart | RangePosition::AfterEnd | RangePosition::Invalid => Self::None,
        }
    }

    /// Day counts as chosen (for `aria-selected` style flags).
    pub const fn is_selected(self) -> bool {
        !matches!(self, Self::None)
    }

    pub const fn is_range_start(self) -> bool {
        matches!(self, Self::RangeStart | Self::RangeStartAndEnd)
    }

    pub const fn is_range_end(self) -> bool {
        matches!(self, Self::RangeEnd | Self::RangeStartAndEnd)
    }
}

/// One day of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCell {
    /// The real date, also for days borrowed from neighbouring months.
    pub date:                      CalendarDate,
    pub belongs_to_displayed_month: bool,
    pub state:                     CellState,
    /// Part of a provisional range previewed under the pointer.
    pub in_hover:                  bool,
}

/// A month laid out as 6 rows of 7 days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    month:   YearMonth,
    leading: usize,
    cells:   [DisplayCell; GRID_CELLS],
}

impl Grid {
    /// Lays out `month` with no selection state, or `None` when the six
    /// weeks around it leave years 1..=9999.
    fn layout(month: YearMonth, start_of_week: Weekday) -> Option<Self> {
        let first = month.first_day();
        let leading = first.weekday().column(start_of_week);
        let back = i64::try_from(leading).ok()?;
        let cells: Vec<DisplayCell> = (0..GRID_CELLS)
            .map(|idx| {
                let date = first.add_days(i64::try_from(idx).ok()? - back)?;
                Some(DisplayCell {
                    date,
                    belongs_to_displayed_month: date.year_month() == month,
                    state: CellState::None,
                    in_hover: false,
                })
            })
            .collect::<Option<_>>()?;
        let cells = <[DisplayCell; GRID_CELLS]>::try_from(cells).ok()?;
        Some(Self { month, leading, cells })
    }

    pub const fn month(&self) -> YearMonth {
        self.month
    }

    /// Days borrowed from the previous month; also the column of the 1st.
    pub const fn leading_days(&self) -> usize {
        self.leading
    }

    pub const fn cells(&self) -> &[DisplayCell; GRID_CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<&DisplayCell> {
        self.cells.get(index)
    }

    /// Cell index of `date`, if it is on this grid.
    pub fn index_of(&self, date: CalendarDate) -> Option<usize> {
        self.cells.iter().position(|cell| cell.date == date)
    }

    /// The seven cells of row `row` (0..6).
    pub fn row(&self, row: usize) -> Option<&[DisplayCell]> {
        self.cells.chunks(DAYS_PER_WEEK).nth(row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DisplayCell> {
        self.cells.iter()
    }

    fn apply(&mut self, state: impl Fn(CalendarDate) -> CellState) {
        for cell in &mut self.cells {
            cell.state = state(cell.date);
        }
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a DisplayCell;
    type IntoIter = std::slice::Iter<'a, DisplayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Projects `selection` onto the grid of `month`.
///
/// Single mode marks the chosen day `Selected`; range mode classifies every
/// day against the range. Returns `None` for the first and last months of
/// the calendar when their grid would need days before 0001-01-01 or after
/// 9999-12-31.
pub fn project(
    month: YearMonth,
    selection: &Selection,
    mode: Mode,
    start_of_week: Weekday,
) -> Option<Grid> {
    let mut grid = Grid::layout(month, start_of_week)?;
    match mode {
        Mode::Single => grid.apply(|date| {
            if selection.start() == Some(date) {
                CellState::Selected
            } else {
                CellState::None
            }
        }),
        Mode::Range => grid.apply(|date| CellState::from_position(selection.position_of(date))),
    }
    Some(grid)
}

/// Projects the provisional range between an anchored start and the
/// hovered day, flagging the previewed stretch with `in_hover`.
///
/// Hovering forward previews `[anchor, hover]` and flags the inner days and
/// the end. Hovering backward previews `[hover, anchor]` and flags the
/// inner days and the new start.
pub(crate) fn project_hover(
    month: YearMonth,
    anchor: CalendarDate,
    hover: CalendarDate,
    start_of_week: Weekday,
) -> Option<Grid> {
    let forward = anchor <= hover;
    let preview = Selection::range(anchor, hover);
    let mut grid = project(month, &preview, Mode::Range, start_of_week)?;
    for cell in &mut grid.cells {
        cell.in_hover = match cell.state {
            CellState::InRange => true,
            CellState::RangeEnd | CellState::RangeStartAndEnd => forward,
            CellState::RangeStart => !forward,
            CellState::None | CellState::Selected => false,
        };
    }
    Some(grid)
}
