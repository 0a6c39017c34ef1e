//! Assembles the beach analytics dashboard.

use lifeguard_analytics_models::{
    AnalyticsConfig, DailyTotal, Dashboard, DateRange, InsightInputs, PostAggregate,
    VisitorLogEntry,
};

use crate::{
    aggregate_daily, build_heatmap, compute_kpi, derive_insights, heatmap_grid,
    project_post_loads, sample_counts, top_locations, weekday_weekend_averages,
};

/// Builds every dashboard section for `range`.
///
/// `daily_totals` and `post_aggregates` are the authoritative pre-summed
/// rows. `logs` is the capped raw sample that drives the water/land ratio,
/// the heatmap and the weekend comparison.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_dashboard(
    range: DateRange,
    daily_totals: &[DailyTotal],
    post_aggregates: &[PostAggregate],
    logs: &[VisitorLogEntry],
    config: &AnalyticsConfig,
) -> Dashboard {
    let sample_capped = logs.len() >= config.log_row_cap as usize;
    if sample_capped {
        log::warn!(
            "Visitor log sample for {}..{} hit the {} row cap; water/land split and heatmap are approximate",
            range.start,
            range.end,
            config.log_row_cap
        );
    }

    let kpi = compute_kpi(daily_totals, sample_counts(logs));
    let seasonal = aggregate_daily(daily_totals, &range);
    let top = top_locations(project_post_loads(post_aggregates), config.top_locations);
    let heatmap = heatmap_grid(&build_heatmap(logs), &config.heatmap_slots);
    let week = weekday_weekend_averages(logs);

    let inputs = InsightInputs {
        safety_index: kpi.safety_index,
        busiest_post_name: top.first().map(|l| l.name.clone()).unwrap_or_default(),
        busiest_post_load: top.first().map_or(0.0, |l| l.total() as f64),
        weekend_avg: week.weekend_avg,
        weekday_avg: week.weekday_avg,
    };
    let insights = derive_insights(&inputs, config);

    log::debug!(
        "Built dashboard for {}..{}: {} visitors, {} locations, {} insights",
        range.start,
        range.end,
        kpi.total_visitors,
        top.len(),
        insights.len()
    );

    Dashboard {
        range,
        kpi,
        seasonal,
        top_locations: top,
        heatmap,
        insights,
        sample_capped,
    }
}
