//! Headline figures.

use lifeguard_analytics_models::{DailyTotal, Kpi, SampleCounts, WaterLandSplit};

use crate::split::estimate_water_land_split;

/// Water as a percentage of land, `0.0` when there is no land count.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn safety_index(split: WaterLandSplit) -> f64 {
    if split.land > 0 {
        split.water as f64 / split.land as f64 * 100.0
    } else {
        0.0
    }
}

/// Computes the KPI block from the authoritative daily totals and the raw
/// log sample used for the water/land ratio.
///
/// The average is taken over the reported days, not the calendar range.
/// The busiest date is the first day holding the maximum total.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn compute_kpi(daily_totals: &[DailyTotal], sample: SampleCounts) -> Kpi {
    let total_visitors: i64 = daily_totals.iter().map(|d| d.total_visitors).sum();
    let days = daily_totals.len().max(1);
    let avg_daily = (total_visitors as f64 / days as f64).round() as i64;

    let mut busiest: Option<&DailyTotal> = None;
    for day in daily_totals {
        if busiest.is_none_or(|b| day.total_visitors > b.total_visitors) {
            busiest = Some(day);
        }
    }

    let split = estimate_water_land_split(total_visitors, sample);

    Kpi {
        total_visitors,
        avg_daily,
        busiest_date: busiest.map(|d| d.date),
        safety_index: safety_index(split),
        split,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32, total: i64) -> DailyTotal {
        DailyTotal {
            date: NaiveDate::from_ymd_opt(2024, 7, d).unwrap(),
            total_visitors: total,
        }
    }

    #[test]
    fn empty_daily_totals_give_zero_kpi() {
        let kpi = compute_kpi(&[], SampleCounts { water: 5, land: 5 });
        assert_eq!(kpi.total_visitors, 0);
        assert_eq!(kpi.avg_daily, 0);
        assert_eq!(kpi.busiest_date, None);
        assert_eq!(kpi.split, WaterLandSplit::default());
        assert!(kpi.safety_index.abs() < f64::EPSILON);
    }

    #[test]
    fn totals_average_and_busiest_day() {
        let kpi = compute_kpi(
            &[day(1, 100), day(2, 250), day(3, 250), day(4, 1)],
            SampleCounts { water: 1, land: 4 },
        );
        assert_eq!(kpi.total_visitors, 601);
        assert_eq!(kpi.avg_daily, 150);
        assert_eq!(kpi.busiest_date, NaiveDate::from_ymd_opt(2024, 7, 2));
        assert_eq!(kpi.split, WaterLandSplit { water: 120, land: 481 });
    }

    #[test]
    fn safety_index_is_water_over_land() {
        let index = safety_index(WaterLandSplit { water: 35, land: 100 });
        assert!((index - 35.0).abs() < 1e-9);
        assert!(safety_index(WaterLandSplit { water: 10, land: 0 }).abs() < f64::EPSILON);
    }
}
