//! Water/land ratio projection.

use lifeguard_analytics_models::{SampleCounts, VisitorLogEntry, WaterLandSplit};

/// Sums water and land counts over a raw log sample.
#[must_use]
pub fn sample_counts(logs: &[VisitorLogEntry]) -> SampleCounts {
    logs.iter().fold(SampleCounts::default(), |acc, log| SampleCounts {
        water: acc.water + log.water_count,
        land: acc.land + log.land_count,
    })
}

/// Water share of a water/land pair, `0.0` when both are zero.
pub(crate) fn water_ratio(water: f64, land: f64) -> f64 {
    let sum = water + land;
    if sum > 0.0 { water / sum } else { 0.0 }
}

/// Splits `total` using the water share observed in `sample`.
///
/// `water = round(total * ratio)` and `land` takes the remainder, so the
/// two always add up to `total`. An empty sample puts everything on land.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn estimate_water_land_split(total: i64, sample: SampleCounts) -> WaterLandSplit {
    let ratio = water_ratio(sample.water as f64, sample.land as f64);
    let water = (total as f64 * ratio).round() as i64;
    WaterLandSplit {
        water,
        land: total - water,
    }
}
