//! Rule catalog lookups and point totals.

use std::collections::{BTreeMap, BTreeSet};

use lifeguard_scoring_models::{LookupPolicy, RuleId, ScoringRule, ShiftId};

use crate::ScoringError;

/// Immutable, id-indexed view of the scoring rule catalog.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: BTreeMap<RuleId, ScoringRule>,
}

impl RuleCatalog {
    /// Indexes `rules` by id. If an id appears twice the first row wins.
    #[must_use]
    pub fn new(rules: Vec<ScoringRule>) -> Self {
        let mut map = BTreeMap::new();
        for rule in rules {
            map.entry(rule.id).or_insert(rule);
        }
        Self { rules: map }
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn lookup(&self, id: RuleId) -> Option<&ScoringRule> {
        self.rules.get(&id)
    }

    /// Rules in ascending id order.
    pub fn rules(&self) -> impl Iterator<Item = &ScoringRule> {
        self.rules.values()
    }

    /// Number of rules in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves a rule's quantity under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::UnknownRule`] if the id is missing and the
    /// policy is [`LookupPolicy::Strict`].
    pub fn quantity(&self, id: RuleId, policy: LookupPolicy) -> Result<i64, ScoringError> {
        match (self.lookup(id), policy) {
            (Some(rule), _) => Ok(rule.quantity),
            (None, LookupPolicy::Lenient) => {
                log::warn!("Scoring rule {id} not in catalog, counting it as 0 points");
                Ok(0)
            }
            (None, LookupPolicy::Strict) => Err(ScoringError::UnknownRule { rule_id: id }),
        }
    }
}

/// Sums the quantities of the selected rules.
///
/// Unknown ids contribute zero and duplicate ids are counted once. An
/// empty selection totals zero.
#[must_use]
pub fn compute_total(selected: &[RuleId], catalog: &RuleCatalog) -> i64 {
    let mut seen = BTreeSet::new();
    selected
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| catalog.lookup(*id))
        .map(|rule| rule.quantity)
        .sum()
}

/// Sums the quantities of the selected rules under an explicit policy.
///
/// # Errors
///
/// Returns [`ScoringError::UnknownRule`] for the first unknown id when
/// `policy` is [`LookupPolicy::Strict`].
pub fn compute_total_with_policy(
    selected: &[RuleId],
    catalog: &RuleCatalog,
    policy: LookupPolicy,
) -> Result<i64, ScoringError> {
    let mut seen = BTreeSet::new();
    let mut total = 0i64;
    for id in selected {
        if seen.insert(*id) {
            total += catalog.quantity(*id, policy)?;
        }
    }
    Ok(total)
}

/// An administrator's in-progress rule selection for one shift.
///
/// The total is recomputed on every change so it always equals the sum of
/// the currently selected rules' quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftScoreSelection {
    shift_id: ShiftId,
    rule_ids: Vec<RuleId>,
    total: i64,
}

impl ShiftScoreSelection {
    /// Starts an empty selection.
    #[must_use]
    pub const fn new(shift_id: ShiftId) -> Self {
        Self {
            shift_id,
            rule_ids: Vec::new(),
            total: 0,
        }
    }

    /// Restores a selection from the persisted itemized rule ids.
    #[must_use]
    pub fn from_existing(shift_id: ShiftId, rule_ids: &[RuleId], catalog: &RuleCatalog) -> Self {
        let mut seen = BTreeSet::new();
        let rule_ids: Vec<RuleId> = rule_ids
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        let total = compute_total(&rule_ids, catalog);
        Self {
            shift_id,
            rule_ids,
            total,
        }
    }

    /// Adds the rule if absent, removes it if present, and returns whether
    /// it is selected afterwards.
    pub fn toggle(&mut self, rule_id: RuleId, catalog: &RuleCatalog) -> bool {
        let selected = if let Some(pos) = self.rule_ids.iter().position(|id| *id == rule_id) {
            self.rule_ids.remove(pos);
            false
        } else {
            self.rule_ids.push(rule_id);
            true
        };
        self.total = compute_total(&self.rule_ids, catalog);
        selected
    }

    /// Whether the rule is currently selected.
    #[must_use]
    pub fn contains(&self, rule_id: RuleId) -> bool {
        self.rule_ids.contains(&rule_id)
    }

    /// Selected rule ids in the order they were chosen.
    #[must_use]
    pub fn rule_ids(&self) -> &[RuleId] {
        &self.rule_ids
    }

    /// Current total.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.total
    }

    /// Shift this selection belongs to.
    #[must_use]
    pub const fn shift_id(&self) -> ShiftId {
        self.shift_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(id: i64, quantity: i64) -> ScoringRule {
        ScoringRule {
            id: RuleId(id),
            name: format!("rule {id}"),
            quantity,
            comment: None,
        }
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::new(vec![rule(1, 5), rule(2, -3), rule(3, 10), rule(4, -20)])
    }

    #[test]
    fn sums_selected_quantities() {
        let catalog = catalog();
        assert_eq!(compute_total(&[RuleId(1), RuleId(2), RuleId(3)], &catalog), 12);
        assert_eq!(compute_total(&[RuleId(4)], &catalog), -20);
    }

    #[test]
    fn empty_selection_totals_zero() {
        assert_eq!(compute_total(&[], &catalog()), 0);
        assert_eq!(compute_total(&[], &RuleCatalog::default()), 0);
    }

    #[test]
    fn unknown_ids_contribute_zero_when_lenient() {
        let catalog = catalog();
        assert_eq!(compute_total(&[RuleId(1), RuleId(99)], &catalog), 5);
        assert_eq!(
            compute_total_with_policy(&[RuleId(1), RuleId(99)], &catalog, LookupPolicy::Lenient)
                .unwrap(),
            5
        );
    }

    #[test]
    fn unknown_ids_rejected_when_strict() {
        let err = compute_total_with_policy(&[RuleId(1), RuleId(99)], &catalog(), LookupPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, ScoringError::UnknownRule { rule_id } if rule_id == RuleId(99)));
        assert!(err.is_validation());
    }

    #[test]
    fn duplicate_ids_counted_once() {
        assert_eq!(compute_total(&[RuleId(3), RuleId(3)], &catalog()), 10);
    }

    #[test]
    fn first_catalog_row_wins_on_duplicate_ids() {
        let catalog = RuleCatalog::new(vec![rule(1, 5), rule(1, 50)]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup(RuleId(1)).map(|r| r.quantity), Some(5));
    }

    #[test]
    fn toggling_recomputes_total() {
        let catalog = catalog();
        let mut selection = ShiftScoreSelection::new(ShiftId(7));

        assert!(selection.toggle(RuleId(1), &catalog));
        assert!(selection.toggle(RuleId(4), &catalog));
        assert_eq!(selection.total(), -15);

        assert!(!selection.toggle(RuleId(1), &catalog));
        assert_eq!(selection.total(), -20);
        assert!(!selection.contains(RuleId(1)));
        assert_eq!(selection.rule_ids(), &[RuleId(4)]);
    }

    #[test]
    fn restores_existing_selection_without_duplicates() {
        let selection = ShiftScoreSelection::from_existing(
            ShiftId(3),
            &[RuleId(2), RuleId(3), RuleId(2)],
            &catalog(),
        );
        assert_eq!(selection.shift_id(), ShiftId(3));
        assert_eq!(selection.rule_ids(), &[RuleId(2), RuleId(3)]);
        assert_eq!(selection.total(), 7);
    }
}
