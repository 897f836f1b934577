//! Named preset ranges such as "last 7 days" or "this month".

use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, ParseError, Selection, Weekday, YearMonth, prelude::*};

/// A named range relative to today. `Custom` stands for "none of the others".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    #[display(fmt = "today")]
    Today,
    #[display(fmt = "yesterday")]
    Yesterday,
    #[display(fmt = "last7days")]
    #[serde(rename = "last7days")]
    Last7Days,
    #[display(fmt = "last30days")]
    #[serde(rename = "last30days")]
    Last30Days,
    #[display(fmt = "last90days")]
    #[serde(rename = "last90days")]
    Last90Days,
    #[display(fmt = "thisWeek")]
    ThisWeek,
    #[display(fmt = "thisMonth")]
    ThisMonth,
    #[display(fmt = "thisYear")]
    ThisYear,
    #[display(fmt = "lastWeek")]
    LastWeek,
    #[display(fmt = "lastMonth")]
    LastMonth,
    #[display(fmt = "lastYear")]
    LastYear,
    #[display(fmt = "nextWeek")]
    NextWeek,
    #[display(fmt = "nextMonth")]
    NextMonth,
    #[display(fmt = "nextYear")]
    NextYear,
    #[display(fmt = "custom")]
    Custom,
}

impl Preset {
    /// Every preset, in matching and display order.
    pub const ALL: [Self; 15] = [
        Self::Today,
        Self::Yesterday,
        Self::Last7Days,
        Self::Last30Days,
        Self::Last90Days,
        Self::ThisWeek,
        Self::ThisMonth,
        Self::ThisYear,
        Self::LastWeek,
        Self::LastMonth,
        Self::LastYear,
        Self::NextWeek,
        Self::NextMonth,
        Self::NextYear,
        Self::Custom,
    ];

    /// Longest span in days this preset can cover. `Custom` reports 0.
    pub const fn max_span(self) -> u32 {
        match self {
            Self::Today | Self::Yesterday => 1,
            Self::Last7Days | Self::ThisWeek | Self::LastWeek | Self::NextWeek => 7,
            Self::Last30Days => 30,
            Self::Last90Days => 90,
            Self::ThisMonth | Self::LastMonth | Self::NextMonth => 31,
            Self::ThisYear | Self::LastYear | Self::NextYear => 366,
            Self::Custom => 0,
        }
    }

    /// The camelCase key used for locale labels and configuration.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Yesterday => "yesterday",
            Self::Last7Days => "last7days",
            Self::Last30Days => "last30days",
            Self::Last90Days => "last90days",
            Self::ThisWeek => "thisWeek",
            Self::ThisMonth => "thisMonth",
            Self::ThisYear => "thisYear",
            Self::LastWeek => "lastWeek",
            Self::LastMonth => "lastMonth",
            Self::LastYear => "lastYear",
            Self::NextWeek => "nextWeek",
            Self::NextMonth => "nextMonth",
            Self::NextYear => "nextYear",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for Preset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == trimmed)
            .ok_or_else(|| ParseError::InvalidFormat(format!("Unknown preset: {trimmed}")))
    }
}

/// A preset together with the dates it covers today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetRange {
    pub preset: Preset,
    /// Closed interval, `None` for `Custom`.
    pub range:  Option<(CalendarDate, CalendarDate)>,
}

impl PresetRange {
    /// The covered dates as a selection; empty for `Custom`.
    pub fn selection(&self) -> Selection {
        self.range.map_or(Selection::EMPTY, |(start, end)| Selection::range(start, end))
    }
}

fn start_of_week(date: CalendarDate, start_of_week: Weekday) -> Option<CalendarDate> {
    let back = date.weekday().column(start_of_week);
    date.add_days(-i64::try_from(back).ok()?)
}

fn week_from(start: CalendarDate) -> Option<(CalendarDate, CalendarDate)> {
    Some((start, start.add_days(6)?))
}

fn whole_month(month: YearMonth) -> (CalendarDate, CalendarDate) {
    (month.first_day(), month.last_day())
}

fn whole_year(year: u16) -> Option<(CalendarDate, CalendarDate)> {
    let first = YearMonth::new(year, crate::JANUARY).ok()?;
    let last = YearMonth::new(year, crate::DECEMBER).ok()?;
    Some((first.first_day(), last.last_day()))
}

fn trailing(today: CalendarDate, days: i64) -> Option<(CalendarDate, CalendarDate)> {
    Some((today.add_days(-(days - 1))?, today))
}

/// Dates covered by `preset`, evaluated as of `today`.
///
/// All ranges are closed. Weeks begin on `start_of_week`. Returns `None`
/// for `Custom`, and for presets that would leave years 1..=9999.
pub fn preset_range(
    preset: Preset,
    today: CalendarDate,
    start_of_week_day: Weekday,
) -> Option<(CalendarDate, CalendarDate)> {
    let this_month = today.year_month();
    match preset {
        Preset::Today => Some((today, today)),
        Preset::Yesterday => {
            let yesterday = today.add_days(-1)?;
            Some((yesterday, yesterday))
        },
        Preset::Last7Days => trailing(today, 7),
        Preset::Last30Days => trailing(today, 30),
        Preset::Last90Days => trailing(today, 90),
        Preset::ThisWeek => week_from(start_of_week(today, start_of_week_day)?),
        Preset::LastWeek => week_from(start_of_week(today, start_of_week_day)?.add_days(-7)?),
        Preset::NextWeek => week_from(start_of_week(today, start_of_week_day)?.add_days(7)?),
        Preset::ThisMonth => Some(whole_month(this_month)),
        Preset::LastMonth => this_month.prev().map(whole_month),
        Preset::NextMonth => this_month.next().map(whole_month),
        Preset::ThisYear => whole_year(today.year()),
        Preset::LastYear => whole_year(today.year().checked_sub(1)?),
        Preset::NextYear => whole_year(today.year().checked_add(1)?),
        Preset::Custom => None,
    }
}

/// Every preset evaluated as of `today`, in [`Preset::ALL`] order.
pub fn preset_ranges(today: CalendarDate, start_of_week: Weekday) -> Vec<PresetRange> {
    Preset::ALL
        .into_iter()
        .map(|preset| PresetRange {
            preset,
            range: preset_range(preset, today, start_of_week),
        })
        .collect()
}

/// Presets that fit within a maximum range length. Without a limit all
/// presets are offered; `Custom` always is.
pub fn available_presets(max_range_days: Option<NonZeroU32>) -> Vec<Preset> {
    Preset::ALL
        .into_iter()
        .filter(|preset| max_range_days.is_none_or(|max| max.get() >= preset.max_span()))
        .collect()
}

/// The first preset whose range equals `selection` on both ends, else `Custom`.
///
/// Partial or empty selections always map to `Custom`.
pub fn matching_preset(selection: &Selection, today: CalendarDate, start_of_week: Weekday) -> Preset {
    let (Some(start), Some(end)) = selection.dates() else {
        return Preset::Custom;
    };
    Preset::ALL
        .into_iter()
        .find(|preset| preset_range(*preset, today, start_of_week) == Some((start, end)))
        .unwrap_or(Preset::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range};

    // Friday
    fn today() -> CalendarDate {
        date(2024, 3, 15)
    }

    #[test]
    fn test_preset_ranges_monday_week() {
        struct TestCase {
            preset:   Preset,
            expected: Option<((u16, u8, u8), (u16, u8, u8))>,
        }

        let cases = [
            TestCase { preset: Preset::Today, expected: Some(((2024, 3, 15), (2024, 3, 15))) },
            TestCase { preset: Preset::Yesterday, expected: Some(((2024, 3, 14), (2024, 3, 14))) },
            TestCase { preset: Preset::Last7Days, expected: Some(((2024, 3, 9), (2024, 3, 15))) },
            TestCase { preset: Preset::Last30Days, expected: Some(((2024, 2, 15), (2024, 3, 15))) },
            TestCase { preset: Preset::Last90Days, expected: Some(((2023, 12, 17), (2024, 3, 15))) },
            TestCase { preset: Preset::ThisWeek, expected: Some(((2024, 3, 11), (2024, 3, 17))) },
            TestCase { preset: Preset::ThisMonth, expected: Some(((2024, 3, 1), (2024, 3, 31))) },
            TestCase { preset: Preset::ThisYear, expected: Some(((2024, 1, 1), (2024, 12, 31))) },
            TestCase { preset: Preset::LastWeek, expected: Some(((2024, 3, 4), (2024, 3, 10))) },
            TestCase { preset: Preset::LastMonth, expected: Some(((2024, 2, 1), (2024, 2, 29))) },
            TestCase { preset: Preset::LastYear, expected: Some(((2023, 1, 1), (2023, 12, 31))) },
            TestCase { preset: Preset::NextWeek, expected: Some(((2024, 3, 18), (2024, 3, 24))) },
            TestCase { preset: Preset::NextMonth, expected: Some(((2024, 4, 1), (2024, 4, 30))) },
            TestCase { preset: Preset::NextYear, expected: Some(((2025, 1, 1), (2025, 12, 31))) },
            TestCase { preset: Preset::Custom, expected: None },
        ];

        for case in &cases {
            let expected = case.expected.map(|(s, e)| (date(s.0, s.1, s.2), date(e.0, e.1, e.2)));
            assert_eq!(
                preset_range(case.preset, today(), Weekday::MONDAY),
                expected,
                "preset {}",
                case.preset
            );
        }
    }

    #[test]
    fn test_this_week_sunday_start() {
        assert_eq!(
            preset_range(Preset::ThisWeek, today(), Weekday::SUNDAY),
            Some((date(2024, 3, 10), date(2024, 3, 16)))
        );
        // today is itself the first day of the week
        assert_eq!(
            preset_range(Preset::ThisWeek, date(2024, 3, 11), Weekday::MONDAY),
            Some((date(2024, 3, 11), date(2024, 3, 17)))
        );
    }

    #[test]
    fn test_month_presets_across_year_boundary() {
        let jan = date(2024, 1, 20);
        assert_eq!(
            preset_range(Preset::LastMonth, jan, Weekday::SUNDAY),
            Some((date(2023, 12, 1), date(2023, 12, 31)))
        );
        let dec = date(2023, 12, 5);
        assert_eq!(
            preset_range(Preset::NextMonth, dec, Weekday::SUNDAY),
            Some((date(2024, 1, 1), date(2024, 1, 31)))
        );
    }

    #[test]
    fn test_preset_ranges_lists_all() {
        let all = preset_ranges(today(), Weekday::MONDAY);
        assert_eq!(all.len(), Preset::ALL.len());
        assert_eq!(all[0].preset, Preset::Today);
        assert_eq!(all.last().unwrap().selection(), Selection::EMPTY);
    }

    #[test]
    fn test_matching_preset() {
        let this_week = range((2024, 3, 11), (2024, 3, 17));
        assert_eq!(matching_preset(&this_week, today(), Weekday::MONDAY), Preset::ThisWeek);

        let off_by_one = range((2024, 3, 11), (2024, 3, 16));
        assert_eq!(matching_preset(&off_by_one, today(), Weekday::MONDAY), Preset::Custom);

        let today_only = range((2024, 3, 15), (2024, 3, 15));
        assert_eq!(matching_preset(&today_only, today(), Weekday::MONDAY), Preset::Today);

        assert_eq!(matching_preset(&Selection::EMPTY, today(), Weekday::MONDAY), Preset::Custom);
        assert_eq!(
            matching_preset(&Selection::single(today()), today(), Weekday::MONDAY),
            Preset::Custom
        );
    }

    #[test]
    fn test_matching_preset_first_wins() {
        // on the last day of the week, last 7 days and this week coincide
        let sunday = date(2024, 3, 17);
        let week = range((2024, 3, 11), (2024, 3, 17));
        assert_eq!(matching_preset(&week, sunday, Weekday::MONDAY), Preset::Last7Days);
    }

    #[test]
    fn test_available_presets() {
        assert_eq!(available_presets(None).len(), Preset::ALL.len());

        let week_limit = available_presets(NonZeroU32::new(7));
        assert_eq!(
            week_limit,
            vec![
                Preset::Today,
                Preset::Yesterday,
                Preset::Last7Days,
                Preset::ThisWeek,
                Preset::LastWeek,
                Preset::NextWeek,
                Preset::Custom,
            ]
        );

        let one_day = available_presets(NonZeroU32::new(1));
        assert_eq!(one_day, vec![Preset::Today, Preset::Yesterday, Preset::Custom]);
    }

    #[test]
    fn test_preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
            assert_eq!(preset.to_string(), preset.name());
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{}\"", preset.name()));
        }
        assert!("fortnight".parse::<Preset>().is_err());
    }
}
