//! Staffing and safety summary across posts.

use std::collections::{BTreeMap, BTreeSet};

use lifeguard_analytics_models::{
    IncidentRecord, IncidentTypeCount, OperationsSummary, PostInfo, PostLoad, ShiftActivity,
    ShiftReportSummary,
};

/// Incident type used when a record has none.
const UNSPECIFIED_INCIDENT: &str = "other";

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn rounded_ratio(numerator: i64, denominator: usize) -> i64 {
    if denominator == 0 {
        0
    } else {
        (numerator as f64 / denominator as f64).round() as i64
    }
}

/// Summarizes shifts, reports and incidents for a range.
///
/// Reports count toward a post when their shift was worked there, and a
/// post's average load is its reported people divided by its shift count.
/// Incident types are sorted by count descending, then by name.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn summarize_operations(
    shifts: &[ShiftActivity],
    reports: &[ShiftReportSummary],
    incidents: &[IncidentRecord],
    posts: &[PostInfo],
) -> OperationsSummary {
    let total_hours: f64 = shifts.iter().filter_map(|s| s.rounded_work_hours).sum();
    let people_beach: i64 = reports.iter().map(|r| r.people_on_beach).sum();
    let people_water: i64 = reports.iter().map(|r| r.people_in_water).sum();
    let total_people = people_beach + people_water;

    let water_share_pct = if total_people > 0 {
        (people_water as f64 / total_people as f64 * 100.0).round() as i64
    } else {
        0
    };

    let post_loads = posts
        .iter()
        .map(|post| {
            let shift_ids: BTreeSet<i64> = shifts
                .iter()
                .filter(|s| s.post_id == post.id)
                .map(|s| s.id)
                .collect();
            let people: i64 = reports
                .iter()
                .filter(|r| shift_ids.contains(&r.shift_id))
                .map(|r| r.people_on_beach + r.people_in_water)
                .sum();
            PostLoad {
                post_id: post.id,
                name: post
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Post #{}", post.id)),
                avg_load: rounded_ratio(people, shift_ids.len()),
                complexity: post.complexity_coefficient,
            }
        })
        .collect();

    let mut by_type: BTreeMap<&str, u64> = BTreeMap::new();
    for incident in incidents {
        let kind = incident
            .incident_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(UNSPECIFIED_INCIDENT);
        *by_type.entry(kind).or_default() += 1;
    }
    let mut incident_types: Vec<IncidentTypeCount> = by_type
        .into_iter()
        .map(|(incident_type, count)| IncidentTypeCount {
            incident_type: incident_type.to_string(),
            count,
        })
        .collect();
    incident_types.sort_by(|a, b| b.count.cmp(&a.count));

    OperationsSummary {
        total_shifts: shifts.len() as u64,
        total_hours,
        total_people,
        total_incidents: incidents.len() as u64,
        avg_people_per_shift: rounded_ratio(total_people, shifts.len()),
        water_share_pct,
        post_loads,
        incident_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(id: i64, post_id: i64, hours: Option<f64>) -> ShiftActivity {
        ShiftActivity {
            id,
            post_id,
            rounded_work_hours: hours,
        }
    }

    fn report(id: i64, shift_id: i64, beach: i64, water: i64) -> ShiftReportSummary {
        ShiftReportSummary {
            id,
            shift_id,
            people_on_beach: beach,
            people_in_water: water,
        }
    }

    fn incident(kind: Option<&str>) -> IncidentRecord {
        IncidentRecord {
            shift_report_id: 1,
            incident_type: kind.map(ToString::to_string),
        }
    }

    fn post(id: i64, name: &str, complexity: f64) -> PostInfo {
        PostInfo {
            id,
            name: Some(name.to_string()),
            complexity_coefficient: Some(complexity),
        }
    }

    #[test]
    fn empty_inputs_summarize_to_zero() {
        let summary = summarize_operations(&[], &[], &[], &[]);
        assert_eq!(summary.total_shifts, 0);
        assert_eq!(summary.avg_people_per_shift, 0);
        assert_eq!(summary.water_share_pct, 0);
        assert!(summary.post_loads.is_empty());
        assert!(summary.incident_types.is_empty());
    }

    #[test]
    fn totals_and_ratios() {
        let shifts = [shift(1, 10, Some(8.0)), shift(2, 10, Some(6.5)), shift(3, 20, None)];
        let reports = [report(1, 1, 100, 50), report(2, 2, 60, 40), report(3, 3, 30, 0)];
        let summary = summarize_operations(&shifts, &reports, &[], &[]);

        assert_eq!(summary.total_shifts, 3);
        assert!((summary.total_hours - 14.5).abs() < f64::EPSILON);
        assert_eq!(summary.total_people, 280);
        assert_eq!(summary.avg_people_per_shift, 93);
        assert_eq!(summary.water_share_pct, 32);
    }

    #[test]
    fn post_load_averages_over_post_shifts() {
        let shifts = [shift(1, 10, None), shift(2, 10, None), shift(3, 20, None)];
        let reports = [report(1, 1, 100, 50), report(2, 3, 10, 0)];
        let posts = [post(10, "Central", 1.5), post(20, "North", 1.0), post(30, "Quiet", 0.8)];
        let summary = summarize_operations(&shifts, &reports, &[], &posts);

        let loads: Vec<_> = summary
            .post_loads
            .iter()
            .map(|p| (p.name.as_str(), p.avg_load))
            .collect();
        assert_eq!(loads, [("Central", 75), ("North", 10), ("Quiet", 0)]);
        assert_eq!(summary.post_loads[0].complexity, Some(1.5));
    }

    #[test]
    fn incident_types_sorted_by_count() {
        let incidents = [
            incident(Some("first_aid")),
            incident(None),
            incident(Some("ambulance")),
            incident(Some("first_aid")),
            incident(Some("")),
        ];
        let summary = summarize_operations(&[], &[], &incidents, &[]);
        let counts: Vec<_> = summary
            .incident_types
            .iter()
            .map(|c| (c.incident_type.as_str(), c.count))
            .collect();
        assert_eq!(counts, [("first_aid", 2), ("other", 2), ("ambulance", 1)]);
        assert_eq!(summary.total_incidents, 5);
    }
}
