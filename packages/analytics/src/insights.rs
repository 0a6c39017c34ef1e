//! Rule-based text insights.

use lifeguard_analytics_models::{AnalyticsConfig, Insight, InsightCategory, InsightInputs};

/// Percentage by which the weekend average exceeds the weekday average.
fn weekend_delta_pct(inputs: &InsightInputs) -> f64 {
    if inputs.weekday_avg > 0.0 {
        (inputs.weekend_avg - inputs.weekday_avg) / inputs.weekday_avg * 100.0
    } else {
        0.0
    }
}

/// Derives the dashboard insights in display order.
///
/// 1. Safety: always exactly one of [`InsightCategory::SafetyWarning`] or
///    [`InsightCategory::SafetyOk`].
/// 2. Traffic: only when weekends are busier than weekdays by more than the
///    configured surge threshold.
/// 3. Busiest location: only when a post name is known.
#[must_use]
pub fn derive_insights(inputs: &InsightInputs, config: &AnalyticsConfig) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(3);

    let safety = inputs.safety_index;
    if safety > config.safety_threshold_pct {
        insights.push(Insight {
            category: InsightCategory::SafetyWarning,
            text: format!(
                "Attention! People in the water make up {safety:.1}% of those on shore, above the \
                 {:.0}% norm. Increase supervision.",
                config.safety_threshold_pct
            ),
        });
    } else {
        insights.push(Insight {
            category: InsightCategory::SafetyOk,
            text: format!("Safety index is normal ({safety:.1}%). The situation is under control."),
        });
    }

    let delta = weekend_delta_pct(inputs);
    if delta > config.weekend_surge_threshold_pct {
        insights.push(Insight {
            category: InsightCategory::TrafficInfo,
            text: format!(
                "Weekend load is {delta:.0}% higher than on weekdays. Plan shifts accordingly."
            ),
        });
    }

    if !inputs.busiest_post_name.is_empty() {
        insights.push(Insight {
            category: InsightCategory::BusiestLocation,
            text: format!(
                "Busiest location: \"{}\" (avg load: {:.0} people).",
                inputs.busiest_post_name, inputs.busiest_post_load
            ),
        });
    }

    insights
}
