//! Gap-filled daily visitor series.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use lifeguard_analytics_models::{DailyPoint, DailyTotal, DateRange};

/// Builds one point per calendar day of `range`, in chronological order.
///
/// Days without a row in `daily_totals` get zero visitors. Rows outside the
/// range are ignored and multiple rows for the same date are summed.
#[must_use]
pub fn aggregate_daily(daily_totals: &[DailyTotal], range: &DateRange) -> Vec<DailyPoint> {
    let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in daily_totals {
        *by_date.entry(row.date).or_default() += row.total_visitors;
    }

    range
        .days()
        .map(|date| DailyPoint {
            date,
            visitors: by_date.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn fills_missing_days_with_zero() {
        let totals = [DailyTotal {
            date: date(2),
            total_visitors: 50,
        }];
        let series = aggregate_daily(&totals, &DateRange::new(date(1), date(3)));
        assert_eq!(
            series,
            vec![
                DailyPoint { date: date(1), visitors: 0 },
                DailyPoint { date: date(2), visitors: 50 },
                DailyPoint { date: date(3), visitors: 0 },
            ]
        );
    }

    #[test]
    fn sums_rows_sharing_a_date() {
        let totals = [
            DailyTotal { date: date(5), total_visitors: 10 },
            DailyTotal { date: date(5), total_visitors: 15 },
        ];
        let series = aggregate_daily(&totals, &DateRange::new(date(5), date(5)));
        assert_eq!(series, vec![DailyPoint { date: date(5), visitors: 25 }]);
    }

    #[test]
    fn ignores_rows_outside_range() {
        let totals = [DailyTotal { date: date(20), total_visitors: 99 }];
        let series = aggregate_daily(&totals, &DateRange::new(date(1), date(2)));
        assert!(series.iter().all(|p| p.visitors == 0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn empty_input_and_inverted_range() {
        assert_eq!(aggregate_daily(&[], &DateRange::new(date(1), date(1))).len(), 1);
        assert!(aggregate_daily(&[], &DateRange::new(date(3), date(1))).is_empty());
    }
}
