//! Day-of-week by time-slot occupancy.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use lifeguard_analytics_models::{
    DAY_LABELS, HeatmapCell, HeatmapGrid, HeatmapKey, VisitorLogEntry, WeekSplitAverages,
};

/// Truncates a stored slot such as `"14:00:00"` to its `HH:MM` label.
#[must_use]
pub fn normalize_time_slot(slot: &str) -> String {
    slot.chars().take(5).collect()
}

/// Weekday index with Monday as 0 and Sunday as 6.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn monday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_monday() as u8
}

/// Averages combined occupancy per (weekday, slot) bucket.
///
/// Only buckets with at least one entry are present in the map.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_heatmap(logs: &[VisitorLogEntry]) -> BTreeMap<HeatmapKey, f64> {
    let mut sums: BTreeMap<HeatmapKey, (i64, u32)> = BTreeMap::new();
    for log in logs {
        let key = HeatmapKey {
            day: monday_index(log.date),
            time_slot: normalize_time_slot(&log.time_slot),
        };
        let (sum, count) = sums.entry(key).or_default();
        *sum += log.load();
        *count += 1;
    }

    sums.into_iter()
        .map(|(key, (sum, count))| (key, sum as f64 / f64::from(count)))
        .collect()
}

/// Flattens a heatmap into labelled cells.
#[must_use]
pub fn heatmap_cells(heatmap: &BTreeMap<HeatmapKey, f64>) -> Vec<HeatmapCell> {
    heatmap
        .iter()
        .map(|(key, load)| HeatmapCell {
            day: key.day,
            day_label: DAY_LABELS
                .get(usize::from(key.day))
                .copied()
                .unwrap_or_default()
                .to_string(),
            time_slot: key.time_slot.clone(),
            load: *load,
        })
        .collect()
}

/// Lays a heatmap out against a fixed slot by day grid.
///
/// Every slot in `slots` gets a row of seven values, Monday first. Buckets
/// missing from `heatmap` are zero and buckets for slots not in `slots` are
/// dropped.
#[must_use]
pub fn heatmap_grid(heatmap: &BTreeMap<HeatmapKey, f64>, slots: &[String]) -> HeatmapGrid {
    let mut max_load = 0.0_f64;
    let loads: Vec<Vec<f64>> = slots
        .iter()
        .map(|slot| {
            (0..7u8)
                .map(|day| {
                    let key = HeatmapKey {
                        day,
                        time_slot: slot.clone(),
                    };
                    let load = heatmap.get(&key).copied().unwrap_or(0.0);
                    max_load = max_load.max(load);
                    load
                })
                .collect::<Vec<f64>>()
        })
        .collect();

    HeatmapGrid {
        day_labels: DAY_LABELS.iter().map(ToString::to_string).collect(),
        time_slots: slots.to_vec(),
        loads,
        max_load,
    }
}

/// Average combined load per log entry on weekends and on weekdays.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn weekday_weekend_averages(logs: &[VisitorLogEntry]) -> WeekSplitAverages {
    let (mut weekend_sum, mut weekend_count) = (0i64, 0u32);
    let (mut weekday_sum, mut weekday_count) = (0i64, 0u32);

    for log in logs {
        if monday_index(log.date) >= 5 {
            weekend_sum += log.load();
            weekend_count += 1;
        } else {
            weekday_sum += log.load();
            weekday_count += 1;
        }
    }

    let avg = |sum: i64, count: u32| {
        if count == 0 {
            0.0
        } else {
            sum as f64 / f64::from(count)
        }
    };

    WeekSplitAverages {
        weekend_avg: avg(weekend_sum, weekend_count),
        weekday_avg: avg(weekday_sum, weekday_count),
    }
}
