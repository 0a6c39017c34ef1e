#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Beach visitor analytics for the lifeguard dashboards.
//!
//! Every function here is a pure computation over rows that were already
//! fetched. Totals come from pre-summed daily and per-post views while the
//! water/land breakdown and the heatmap come from a capped sample of raw
//! per-slot logs, so the split figures are ratio projections.

pub mod daily;
pub mod dashboard;
pub mod heatmap;
pub mod insights;
pub mod kpi;
pub mod locations;
pub mod operations;
pub mod range;
pub mod split;

pub use daily::aggregate_daily;
pub use dashboard::build_dashboard;
pub use heatmap::{build_heatmap, heatmap_grid, monday_index, normalize_time_slot, weekday_weekend_averages};
pub use insights::derive_insights;
pub use kpi::compute_kpi;
pub use locations::{project_post_loads, top_locations};
pub use operations::summarize_operations;
pub use range::{parse_range, resolve_preset, resolve_range};
pub use split::{estimate_water_land_split, sample_counts};

use thiserror::Error;

/// Errors that can occur while preparing analytics inputs.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A date string could not be parsed.
    #[error("Invalid date '{value}': {message}. Expected format: YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Parser message.
        message: String,
    },

    /// The range ends before it starts.
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start.
        start: String,
        /// Requested end.
        end: String,
    },

    /// Only one bound of an explicit range was given.
    #[error("Both start and end are required for an explicit range")]
    IncompleteRange,

    /// The preset name is not recognized.
    #[error("Unknown date preset '{value}'")]
    InvalidPreset {
        /// The rejected input.
        value: String,
    },
}
