#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Beach visitor analytics input and result types.
//!
//! Inputs mirror the rows read from the external store (raw per-slot
//! visitor logs, pre-summed daily and per-post views, shift and report
//! activity). Outputs are the derived shapes the dashboards consume. None
//! of the derived types are persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Day-of-week labels, Monday first.
pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Hourly slots shown on the dashboard heatmap.
pub const DEFAULT_HEATMAP_SLOTS: [&str; 14] = [
    "08:00", "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
    "18:00", "19:00", "20:00", "21:00",
];

/// One raw visitor count for a post and time slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorLogEntry {
    /// Post the count was taken at, when recorded.
    pub post_id: Option<i64>,
    /// Calendar date of the count.
    pub date: NaiveDate,
    /// Slot label as stored, e.g. `"14:00"` or `"14:00:00"`.
    pub time_slot: String,
    /// People on the beach.
    pub land_count: i64,
    /// People in the water.
    pub water_count: i64,
}

impl VisitorLogEntry {
    /// Combined land and water occupancy.
    #[must_use]
    pub const fn load(&self) -> i64 {
        self.land_count + self.water_count
    }
}

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range. `start` after `end` yields an empty range.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Every day in the range in chronological order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Whether `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Named date range shortcuts offered on the dashboards.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatePreset {
    /// The seven days before today, through today.
    #[serde(rename = "last_7_days")]
    #[strum(serialize = "last_7_days")]
    Last7Days,
    /// The thirty days before today, through today.
    #[default]
    #[serde(rename = "last_30_days")]
    #[strum(serialize = "last_30_days")]
    Last30Days,
    /// One calendar month back, through today.
    LastMonth,
    /// May 1 of the current season through today.
    ThisSeason,
    /// May 1 through September 30 of the previous year.
    LastSeason,
}

/// A pre-summed daily visitor total from the daily analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    /// Calendar date.
    pub date: NaiveDate,
    /// Sum of land and water counts for the day.
    pub total_visitors: i64,
}

/// One point of the gap-filled seasonal trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    /// Calendar date.
    pub date: NaiveDate,
    /// Visitors that day, zero if nothing was recorded.
    pub visitors: i64,
}

/// Water and land counts summed over a log sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleCounts {
    /// Summed water counts.
    pub water: i64,
    /// Summed land counts.
    pub land: i64,
}

/// A visitor total split into water and land.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLandSplit {
    /// People in the water.
    pub water: i64,
    /// People on land.
    pub land: i64,
}

/// Key of one heatmap bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapKey {
    /// Day of week, 0 = Monday through 6 = Sunday.
    pub day: u8,
    /// Normalized `HH:MM` slot label.
    pub time_slot: String,
}

/// One populated heatmap bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    /// Day of week, 0 = Monday through 6 = Sunday.
    pub day: u8,
    /// Short day label.
    pub day_label: String,
    /// Normalized `HH:MM` slot label.
    pub time_slot: String,
    /// Mean combined occupancy of the entries in this bucket.
    pub load: f64,
}

/// Heatmap laid out against a fixed slot-by-day grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapGrid {
    /// Column labels, Monday first.
    pub day_labels: Vec<String>,
    /// Row labels.
    pub time_slots: Vec<String>,
    /// `loads[slot][day]`; empty buckets are zero.
    pub loads: Vec<Vec<f64>>,
    /// Largest load in the grid, used for colour scaling.
    pub max_load: f64,
}

/// Per-post row from the by-post analytics view.
///
/// The view only exposes average water and land counts, not sums, so the
/// split of `total_visitors` has to be projected from the averages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAggregate {
    /// Post id.
    pub post_id: i64,
    /// Post name from the joined `posts` row.
    pub name: Option<String>,
    /// Summed visitors.
    pub total_visitors: i64,
    /// Average water count per log entry.
    pub avg_water: f64,
    /// Average land count per log entry.
    pub avg_land: f64,
}

/// Estimated water and land visitors for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLoad {
    /// Display name.
    pub name: String,
    /// Estimated people in the water.
    pub water: i64,
    /// Estimated people on land.
    pub land: i64,
}

impl LocationLoad {
    /// Combined load.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.water + self.land
    }
}

/// Headline figures for a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    /// Authoritative visitor total from the daily view.
    pub total_visitors: i64,
    /// Rounded average visitors per reported day.
    pub avg_daily: i64,
    /// Day with the most visitors.
    pub busiest_date: Option<NaiveDate>,
    /// Water as a percentage of land.
    pub safety_index: f64,
    /// Ratio-projected split of the total.
    pub split: WaterLandSplit,
}

/// Average combined load per log entry on weekends vs weekdays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSplitAverages {
    /// Saturday and Sunday.
    pub weekend_avg: f64,
    /// Monday through Friday.
    pub weekday_avg: f64,
}

/// Figures the insight rules are evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightInputs {
    /// Water as a percentage of land.
    pub safety_index: f64,
    /// Name of the busiest post, empty if unknown.
    pub busiest_post_name: String,
    /// Combined load of the busiest post.
    pub busiest_post_load: f64,
    /// Average load per weekend log entry.
    pub weekend_avg: f64,
    /// Average load per weekday log entry.
    pub weekday_avg: f64,
}

/// Kind of a derived insight.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InsightCategory {
    /// Water share above the safety threshold.
    SafetyWarning,
    /// Water share within the safety threshold.
    SafetyOk,
    /// Weekend traffic notably above weekdays.
    TrafficInfo,
    /// Names the busiest post.
    BusiestLocation,
}

/// A derived, human-readable observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Kind of insight.
    pub category: InsightCategory,
    /// Rendered text with the computed figures embedded.
    pub text: String,
}

/// Policy constants for the analytics derivations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsConfig {
    /// Safety index above which a warning is emitted.
    pub safety_threshold_pct: f64,
    /// Weekend-over-weekday increase above which traffic is flagged.
    pub weekend_surge_threshold_pct: f64,
    /// Number of locations in the top list.
    pub top_locations: usize,
    /// Row cap applied when sampling raw visitor logs.
    pub log_row_cap: u32,
    /// Heatmap rows.
    pub heatmap_slots: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            safety_threshold_pct: 30.0,
            weekend_surge_threshold_pct: 20.0,
            top_locations: 5,
            log_row_cap: 10_000,
            heatmap_slots: DEFAULT_HEATMAP_SLOTS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Everything the beach analytics dashboard shows for a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Queried range.
    pub range: DateRange,
    /// Headline figures.
    pub kpi: Kpi,
    /// Gap-filled daily series.
    pub seasonal: Vec<DailyPoint>,
    /// Busiest locations, descending.
    pub top_locations: Vec<LocationLoad>,
    /// Day-by-slot average load.
    pub heatmap: HeatmapGrid,
    /// Derived observations in display order.
    pub insights: Vec<Insight>,
    /// Whether the raw log sample hit the row cap, making the water/land
    /// ratio and heatmap less accurate.
    pub sample_capped: bool,
}

/// A shift row as used by the operations summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftActivity {
    /// Shift id.
    pub id: i64,
    /// Post the shift was worked at.
    pub post_id: i64,
    /// Billable hours after rounding.
    pub rounded_work_hours: Option<f64>,
}

/// Estimated crowd figures from a submitted shift report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReportSummary {
    /// Report id.
    pub id: i64,
    /// Shift the report belongs to.
    pub shift_id: i64,
    /// Estimated people on the beach.
    pub people_on_beach: i64,
    /// Estimated people in the water.
    pub people_in_water: i64,
}

/// An incident attached to a shift report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Report the incident was filed under.
    pub shift_report_id: i64,
    /// Incident type code, e.g. `medical_aid`.
    pub incident_type: Option<String>,
}

/// A beach post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostInfo {
    /// Post id.
    pub id: i64,
    /// Display name.
    pub name: Option<String>,
    /// Staffing complexity coefficient.
    pub complexity_coefficient: Option<f64>,
}

/// Average crowd per shift at a post next to its complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLoad {
    /// Post id.
    pub post_id: i64,
    /// Display name.
    pub name: String,
    /// Rounded average people per shift.
    pub avg_load: i64,
    /// Staffing complexity coefficient.
    pub complexity: Option<f64>,
}

/// Number of incidents of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentTypeCount {
    /// Incident type code.
    pub incident_type: String,
    /// Occurrences.
    pub count: u64,
}

/// Staffing and safety overview for a range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationsSummary {
    /// Shifts started in the range.
    pub total_shifts: u64,
    /// Sum of rounded work hours.
    pub total_hours: f64,
    /// Reported people on the beach and in the water.
    pub total_people: i64,
    /// Incidents filed in the range.
    pub total_incidents: u64,
    /// Rounded reported people per shift.
    pub avg_people_per_shift: i64,
    /// Rounded percentage of reported people in the water.
    pub water_share_pct: i64,
    /// Per-post average load, in post order.
    pub post_loads: Vec<PostLoad>,
    /// Incident counts by type, descending.
    pub incident_types: Vec<IncidentTypeCount>,
}
