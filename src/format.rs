//! Locale tables and date-to-text formatting.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Mode, Preset, Selection};

/// Names and labels a picker shows, indexed Sunday-first for weekdays and
/// January-first for months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Locale {
    pub months_short:    Vec<String>,
    pub months_long:     Vec<String>,
    pub week_days_short: Vec<String>,
    pub week_days_long:  Vec<String>,
    pub clear:           String,
    pub apply:           String,
    /// Label per preset, keyed by [`Preset::name`].
    pub presets:         HashMap<Preset, String>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

impl Locale {
    /// English names and labels.
    pub fn english() -> Self {
        let presets = [
            (Preset::Today, "Today"),
            (Preset::Yesterday, "Yesterday"),
            (Preset::Last7Days, "Last 7 days"),
            (Preset::Last30Days, "Last 30 days"),
            (Preset::Last90Days, "Last 90 days"),
            (Preset::ThisWeek, "This week"),
            (Preset::ThisMonth, "This month"),
            (Preset::ThisYear, "This year"),
            (Preset::LastWeek, "Last week"),
            (Preset::LastMonth, "Last month"),
            (Preset::LastYear, "Last year"),
            (Preset::NextWeek, "Next week"),
            (Preset::NextMonth, "Next month"),
            (Preset::NextYear, "Next year"),
            (Preset::Custom, "Custom"),
        ]
        .into_iter()
        .map(|(preset, label)| (preset, label.to_owned()))
        .collect();

        Self {
            months_short: owned(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]),
            months_long: owned(&[
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]),
            week_days_short: owned(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
            week_days_long: owned(&[
                "Sunday",
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
            ]),
            clear: "Clear".to_owned(),
            apply: "Apply".to_owned(),
            presets,
        }
    }

    /// Label for a preset, if the locale has one.
    pub fn preset_label(&self, preset: Preset) -> Option<&str> {
        self.presets.get(&preset).map(String::as_str)
    }

    /// Long month name for a 1-based month, empty if missing.
    pub fn month_long(&self, month: u8) -> &str {
        lookup(&self.months_long, usize::from(month).wrapping_sub(1))
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

fn lookup(names: &[String], idx: usize) -> &str {
    names.get(idx).map_or("", String::as_str)
}

/// Resolves one pattern token, `None` if the run is not a known token.
fn token(date: CalendarDate, symbol: char, run: usize, locale: &Locale) -> Option<String> {
    let month_idx = usize::from(date.month()) - 1;
    let weekday_idx = date.weekday().index();
    let year = date.year().to_string();
    let value = match (symbol, run) {
        ('d', 1) => date.day().to_string(),
        ('d', 2) => format!("{:02}", date.day()),
        ('D', 1) => lookup(&locale.week_days_short, weekday_idx).to_owned(),
        ('D', 2) => lookup(&locale.week_days_long, weekday_idx).to_owned(),
        ('m', 1) => date.month().to_string(),
        ('m', 2) => format!("{:02}", date.month()),
        ('M', 1) => lookup(&locale.months_short, month_idx).to_owned(),
        ('M', 2) => lookup(&locale.months_long, month_idx).to_owned(),
        ('Y', 2) => year[year.len().saturating_sub(2)..].to_owned(),
        ('Y', 4) => year,
        _ => return None,
    };
    Some(value)
}

/// Formats a date by substituting tokens in `pattern`.
///
/// | token  | output                          |
/// |--------|---------------------------------|
/// | `d`    | day, `5`                        |
/// | `dd`   | zero-padded day, `05`           |
/// | `D`    | short weekday name from locale  |
/// | `DD`   | long weekday name from locale   |
/// | `m`    | month, `3`                      |
/// | `mm`   | zero-padded month, `03`         |
/// | `M`    | short month name from locale    |
/// | `MM`   | long month name from locale     |
/// | `YY`   | last two digits of the year     |
/// | `YYYY` | full year                       |
///
/// Runs are matched greedily (`d`/`D`/`m`/`M` up to two, `Y` two to four);
/// a run that is not a token, such as `YYY`, is copied through unchanged.
/// A missing date formats as the empty string.
///
/// `MM` is always the long name, so `dd-MM-YYYY` renders `05-March-2024`;
/// use `dd-M-YYYY` for `05-Mar-2024`.
pub fn format_date(date: Option<CalendarDate>, pattern: &str, locale: &Locale) -> String {
    let Some(date) = date else {
        return String::new();
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        let symbol = chars[i];
        let (min_run, max_run) = match symbol {
            'd' | 'D' | 'm' | 'M' => (1, 2),
            'Y' => (2, 4),
            _ => (0, 0),
        };
        let run = chars[i..].iter().take(max_run).take_while(|c| **c == symbol).count();
        if max_run == 0 || run < min_run {
            out.push(symbol);
            i += 1;
            continue;
        }

        match token(date, symbol, run, locale) {
            Some(value) => out.push_str(&value),
            None => out.extend(&chars[i..i + run]),
        }
        i += run;
    }
    out
}

/// Rotates a week's worth of names so that `start_index` comes first.
pub fn rotate_week_days<T: Clone>(start_index: usize, names: &[T]) -> Vec<T> {
    if names.is_empty() {
        return Vec::new();
    }
    let idx = start_index % names.len();
    names[idx..].iter().chain(&names[..idx]).cloned().collect()
}

/// Text for the picker's value field.
///
/// Empty selections show the placeholder. A complete range that matches a
/// named preset shows the preset's label; other ranges show
/// `"<start> - <end>"` with the placeholder standing in for a missing end.
pub fn display_value(
    selection: &Selection,
    mode: Mode,
    preset: Option<Preset>,
    pattern: &str,
    locale: &Locale,
    placeholder: &str,
) -> String {
    if selection.is_empty() {
        return placeholder.to_owned();
    }

    let show = |date: Option<CalendarDate>| {
        date.map_or_else(|| placeholder.to_owned(), |d| format_date(Some(d), pattern, locale))
    };

    match mode {
        Mode::Single => show(selection.start()),
        Mode::Range => {
            let label = preset
                .filter(|p| *p != Preset::Custom && selection.is_complete())
                .and_then(|p| locale.preset_label(p));
            label.map_or_else(
                || format!("{} - {}", show(selection.start()), show(selection.end())),
                str::to_owned,
            )
        },
    }
}
