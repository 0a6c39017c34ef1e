//! Builds the write plan for a shift's point selection.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use lifeguard_scoring_models::{
    Actor, DEFAULT_COEFFICIENT, PersistencePlan, RuleId, ScoringConfig, Shift, ShiftPointRecord,
    ShiftUpdate,
};

use crate::{RuleCatalog, ScoringError};

/// Builds the shift total update and one itemized record per selected rule.
///
/// The records replace the shift's existing set in full. Each carries the
/// rule quantity as both base and awarded points with a coefficient of
/// `1.0`. Duplicate ids are collapsed, keeping first-seen order. Under the
/// lenient policy an unknown id counts as 0 points and gets no record,
/// since there is no catalog row for it to reference.
///
/// # Errors
///
/// Returns [`ScoringError::UnknownRule`] if a selected id is not in the
/// catalog and the configured lookup policy is strict.
pub fn build_persistence_plan(
    shift: &Shift,
    selected: &[RuleId],
    catalog: &RuleCatalog,
    actor: &Actor,
    timestamp: DateTime<Utc>,
    config: &ScoringConfig,
) -> Result<PersistencePlan, ScoringError> {
    let policy = config.lookup_policy;
    let mut seen = BTreeSet::new();
    let mut records = Vec::new();

    for &rule_id in selected.iter().filter(|id| seen.insert(**id)) {
        let Some(rule) = catalog.lookup(rule_id) else {
            // Warns or rejects depending on the policy.
            catalog.quantity(rule_id, policy)?;
            continue;
        };
        records.push(ShiftPointRecord {
            shift_id: shift.id,
            user_id: shift.user_id,
            rule_id,
            points_awarded: rule.quantity,
            base_points_from_rule: rule.quantity,
            coefficient_applied: DEFAULT_COEFFICIENT,
            awarded_by: Some(actor.id),
            awarded_at: Some(timestamp),
            comment: Some(config.provenance_comment.clone()),
        });
    }

    let points = records.iter().map(|r| r.points_awarded).sum();

    Ok(PersistencePlan {
        shift_id: shift.id,
        shift_update: ShiftUpdate { points },
        records,
    })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use lifeguard_scoring_models::{LookupPolicy, Role, ScoringRule, ShiftId, UserId};

    use super::*;

    fn catalog() -> RuleCatalog {
        RuleCatalog::new(vec![
            ScoringRule {
                id: RuleId(1),
                name: "Clean post".to_string(),
                quantity: 3,
                comment: None,
            },
            ScoringRule {
                id: RuleId(2),
                name: "Late arrival".to_string(),
                quantity: -5,
                comment: Some("more than 15 minutes".to_string()),
            },
        ])
    }

    fn shift() -> Shift {
        Shift {
            id: ShiftId(40),
            user_id: UserId(12),
            points: None,
        }
    }

    const ACTOR: Actor = Actor {
        id: UserId(1),
        role: Role::Admin,
    };

    #[test]
    fn one_record_per_selected_rule() {
        let at = Utc.with_ymd_and_hms(2024, 6, 2, 18, 0, 0).unwrap();
        let plan = build_persistence_plan(
            &shift(),
            &[RuleId(1), RuleId(2)],
            &catalog(),
            &ACTOR,
            at,
            &ScoringConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.shift_id, ShiftId(40));
        assert_eq!(plan.shift_update.points, -2);
        assert_eq!(plan.records.len(), 2);

        let late = &plan.records[1];
        assert_eq!(late.shift_id, ShiftId(40));
        assert_eq!(late.user_id, UserId(12));
        assert_eq!(late.rule_id, RuleId(2));
        assert_eq!(late.points_awarded, -5);
        assert_eq!(late.base_points_from_rule, -5);
        assert!((late.coefficient_applied - 1.0).abs() < f64::EPSILON);
        assert_eq!(late.awarded_by, Some(UserId(1)));
        assert_eq!(late.awarded_at, Some(at));
        assert_eq!(late.comment.as_deref(), Some("Admin Panel Update"));
    }

    #[test]
    fn empty_selection_plans_zero_total_and_no_records() {
        let plan = build_persistence_plan(
            &shift(),
            &[],
            &catalog(),
            &ACTOR,
            Utc::now(),
            &ScoringConfig::default(),
        )
        .unwrap();
        assert_eq!(plan.shift_update.points, 0);
        assert!(plan.records.is_empty());
    }

    #[test]
    fn same_inputs_yield_same_total_and_rules() {
        let first = build_persistence_plan(
            &shift(),
            &[RuleId(2), RuleId(1)],
            &catalog(),
            &ACTOR,
            Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap(),
            &ScoringConfig::default(),
        )
        .unwrap();
        let second = build_persistence_plan(
            &shift(),
            &[RuleId(2), RuleId(1)],
            &catalog(),
            &ACTOR,
            Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            &ScoringConfig::default(),
        )
        .unwrap();

        assert_eq!(first.shift_update, second.shift_update);
        let ids = |plan: &PersistencePlan| plan.records.iter().map(|r| r.rule_id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }

    #[test]
    fn lenient_unknown_rule_counts_zero_without_record() {
        let plan = build_persistence_plan(
            &shift(),
            &[RuleId(77), RuleId(1), RuleId(2)],
            &catalog(),
            &ACTOR,
            Utc::now(),
            &ScoringConfig::default(),
        )
        .unwrap();
        assert_eq!(plan.shift_update.points, -2);
        assert_eq!(plan.records.len(), 2);
        assert_eq!(
            plan.records.iter().map(|r| r.rule_id).collect::<Vec<_>>(),
            vec![RuleId(1), RuleId(2)]
        );
    }

    #[test]
    fn lenient_all_unknown_plans_zero_and_no_records() {
        let plan = build_persistence_plan(
            &shift(),
            &[RuleId(77), RuleId(78)],
            &catalog(),
            &ACTOR,
            Utc::now(),
            &ScoringConfig::default(),
        )
        .unwrap();
        assert_eq!(plan.shift_update.points, 0);
        assert!(plan.records.is_empty());
    }

    #[test]
    fn strict_unknown_rule_rejects_plan() {
        let config = ScoringConfig {
            lookup_policy: LookupPolicy::Strict,
            ..ScoringConfig::default()
        };
        let result = build_persistence_plan(
            &shift(),
            &[RuleId(77)],
            &catalog(),
            &ACTOR,
            Utc::now(),
            &config,
        );
        assert!(matches!(result, Err(ScoringError::UnknownRule { .. })));
    }

    #[test]
    fn duplicate_selection_collapses() {
        let plan = build_persistence_plan(
            &shift(),
            &[RuleId(1), RuleId(1)],
            &catalog(),
            &ACTOR,
            Utc::now(),
            &ScoringConfig::default(),
        )
        .unwrap();
        assert_eq!(plan.records.len(), 1);
        assert_eq!(plan.shift_update.points, 3);
    }
}
