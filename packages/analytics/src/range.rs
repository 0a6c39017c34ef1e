//! Date range parsing and preset resolution.

use chrono::{Datelike as _, Days, Months, NaiveDate};
use lifeguard_analytics_models::{DatePreset, DateRange};

use crate::AnalyticsError;

/// First month of the bathing season.
const SEASON_START_MONTH: u32 = 5;
/// Last month of the bathing season.
const SEASON_END_MONTH: u32 = 9;

fn parse_date(s: &str) -> Result<NaiveDate, AnalyticsError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| AnalyticsError::InvalidDate {
        value: s.to_string(),
        message: e.to_string(),
    })
}

/// Parses an inclusive `YYYY-MM-DD` range.
///
/// A single-day range (`start == end`) is valid.
///
/// # Errors
///
/// * [`AnalyticsError::InvalidDate`] if either bound does not parse
/// * [`AnalyticsError::InvalidRange`] if `start` is after `end`
pub fn parse_range(start: &str, end: &str) -> Result<DateRange, AnalyticsError> {
    let start_date = parse_date(start)?;
    let end_date = parse_date(end)?;
    if start_date > end_date {
        return Err(AnalyticsError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(DateRange::new(start_date, end_date))
}

fn season_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, SEASON_START_MONTH, 1).unwrap_or(NaiveDate::MIN)
}

/// Resolves a preset against `today`. Every preset ends today except
/// [`DatePreset::LastSeason`], which covers May 1 to September 30 of the
/// previous year.
#[must_use]
pub fn resolve_preset(preset: DatePreset, today: NaiveDate) -> DateRange {
    let back_days = |n| today.checked_sub_days(Days::new(n)).unwrap_or(today);
    match preset {
        DatePreset::Last7Days => DateRange::new(back_days(7), today),
        DatePreset::Last30Days => DateRange::new(back_days(30), today),
        DatePreset::LastMonth => DateRange::new(
            today.checked_sub_months(Months::new(1)).unwrap_or(today),
            today,
        ),
        DatePreset::ThisSeason => {
            // Before May the current season is still last year's.
            let year = if today.month() < SEASON_START_MONTH {
                today.year() - 1
            } else {
                today.year()
            };
            DateRange::new(season_start(year), today)
        }
        DatePreset::LastSeason => {
            let year = today.year() - 1;
            let end = NaiveDate::from_ymd_opt(year, SEASON_END_MONTH, 30).unwrap_or(today);
            DateRange::new(season_start(year), end)
        }
    }
}

/// Resolves request parameters to a range.
///
/// Explicit `start` and `end` win over `preset`. With neither, the range
/// defaults to [`DatePreset::Last30Days`].
///
/// # Errors
///
/// * [`AnalyticsError::IncompleteRange`] if only one bound is given
/// * [`AnalyticsError::InvalidPreset`] if the preset name is unknown
/// * any error from [`parse_range`]
pub fn resolve_range(
    start: Option<&str>,
    end: Option<&str>,
    preset: Option<&str>,
    today: NaiveDate,
) -> Result<DateRange, AnalyticsError> {
    match (start, end) {
        (Some(start), Some(end)) => parse_range(start, end),
        (Some(_), None) | (None, Some(_)) => Err(AnalyticsError::IncompleteRange),
        (None, None) => {
            let preset = match preset {
                Some(name) => {
                    name.trim().parse::<DatePreset>().map_err(|_| AnalyticsError::InvalidPreset {
                        value: name.to_string(),
                    })?
                }
                None => DatePreset::default(),
            };
            Ok(resolve_preset(preset, today))
        }
    }
}
