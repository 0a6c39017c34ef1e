//! Persistence seam for shift points and the save procedure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lifeguard_scoring_models::{
    Actor, PersistencePlan, RuleId, ScoringConfig, ScoringRule, Shift, ShiftId, ShiftPointRecord,
};

use crate::{PersistStep, RuleCatalog, ScoringError, build_persistence_plan};

/// Error type returned by [`ScoringStore`] implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Backend that holds the rule catalog, shifts, users and itemized points.
#[async_trait]
pub trait ScoringStore: Send + Sync {
    /// Loads the full scoring rule catalog.
    async fn load_rules(&self) -> Result<Vec<ScoringRule>, StoreError>;

    /// Loads a shift, or `None` if it does not exist.
    async fn load_shift(&self, shift_id: ShiftId) -> Result<Option<Shift>, StoreError>;

    /// Loads the rule ids currently itemized for a shift.
    async fn load_selected_rule_ids(&self, shift_id: ShiftId) -> Result<Vec<RuleId>, StoreError>;

    /// Loads the itemized records currently stored for a shift.
    async fn load_shift_points(
        &self,
        shift_id: ShiftId,
    ) -> Result<Vec<ShiftPointRecord>, StoreError>;

    /// Resolves the acting user from the external auth provider id.
    async fn resolve_actor(&self, auth_id: &str) -> Result<Option<Actor>, StoreError>;

    /// Deletes every itemized record of a shift. Returns the number removed.
    async fn delete_shift_points(&self, shift_id: ShiftId) -> Result<u64, StoreError>;

    /// Inserts itemized records. Returns the number inserted.
    async fn insert_shift_points(&self, records: &[ShiftPointRecord]) -> Result<u64, StoreError>;

    /// Overwrites the stored point total of a shift.
    async fn update_shift_total(&self, shift_id: ShiftId, points: i64) -> Result<(), StoreError>;

    /// Deletes the shift's records, inserts `plan.records` and writes the
    /// new total as one atomic unit.
    ///
    /// Returns `None` if the backend has no transactions, in which case
    /// [`save_shift_points`] runs the steps one at a time and compensates
    /// on failure.
    async fn replace_shift_points(
        &self,
        _plan: &PersistencePlan,
    ) -> Option<Result<(), StoreError>> {
        None
    }
}

/// An administrator's request to replace a shift's point selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Target shift.
    pub shift_id: ShiftId,
    /// External auth id of the acting administrator.
    pub actor_auth_id: String,
    /// Selected rule ids.
    pub rule_ids: Vec<RuleId>,
}

/// Replaces a shift's itemized points and stored total.
///
/// Every lookup (actor, role, shift, catalog) happens before the first
/// write. The writes run through [`ScoringStore::replace_shift_points`]
/// when the store supports it. Otherwise they run as delete, insert,
/// update-total, and if a write fails after the delete the previous
/// records are restored and any newly inserted ones removed before the
/// error is returned.
///
/// # Errors
///
/// * [`ScoringError::ActorNotFound`], [`ScoringError::Forbidden`],
///   [`ScoringError::ShiftNotFound`] or [`ScoringError::UnknownRule`] if
///   validation fails. Nothing is written.
/// * [`ScoringError::Store`] if a backend step failed and any partial write
///   was rolled back or compensated.
/// * [`ScoringError::Inconsistent`] if the rollback failed as well.
pub async fn save_shift_points<S: ScoringStore + ?Sized>(
    store: &S,
    request: &SaveRequest,
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<PersistencePlan, ScoringError> {
    let actor = store
        .resolve_actor(&request.actor_auth_id)
        .await
        .map_err(|e| ScoringError::store(PersistStep::Load, &e))?
        .ok_or_else(|| ScoringError::ActorNotFound {
            auth_id: request.actor_auth_id.clone(),
        })?;

    if !actor.role.can_award_points() {
        return Err(ScoringError::Forbidden { role: actor.role });
    }

    let shift = store
        .load_shift(request.shift_id)
        .await
        .map_err(|e| ScoringError::store(PersistStep::Load, &e))?
        .ok_or(ScoringError::ShiftNotFound {
            shift_id: request.shift_id,
        })?;

    let rules = store
        .load_rules()
        .await
        .map_err(|e| ScoringError::store(PersistStep::Load, &e))?;
    let catalog = RuleCatalog::new(rules);

    let plan = build_persistence_plan(&shift, &request.rule_ids, &catalog, &actor, now, config)?;

    match store.replace_shift_points(&plan).await {
        Some(result) => result.map_err(|e| ScoringError::store(PersistStep::Replace, &e))?,
        None => replace_with_compensation(store, &plan).await?,
    }

    log::info!(
        "Saved {} point record(s) for shift {} (total {}) by user {}",
        plan.records.len(),
        shift.id,
        plan.shift_update.points,
        actor.id,
    );

    Ok(plan)
}

/// Runs delete, insert and update-total one at a time, restoring the
/// previous records if a step after the delete fails.
async fn replace_with_compensation<S: ScoringStore + ?Sized>(
    store: &S,
    plan: &PersistencePlan,
) -> Result<(), ScoringError> {
    let shift_id = plan.shift_id;
    let previous = store
        .load_shift_points(shift_id)
        .await
        .map_err(|e| ScoringError::store(PersistStep::Load, &e))?;

    store
        .delete_shift_points(shift_id)
        .await
        .map_err(|e| ScoringError::store(PersistStep::Delete, &e))?;

    if !plan.records.is_empty()
        && let Err(e) = store.insert_shift_points(&plan.records).await
    {
        // The batch may have been partially written.
        return Err(restore(store, shift_id, &previous, PersistStep::Insert, &e, true).await);
    }

    if let Err(e) = store
        .update_shift_total(shift_id, plan.shift_update.points)
        .await
    {
        let inserted = !plan.records.is_empty();
        return Err(restore(store, shift_id, &previous, PersistStep::UpdateTotal, &e, inserted).await);
    }

    Ok(())
}

/// Puts the previous itemized records back after a failed write and
/// converts the failure into the error to return.
async fn restore<S: ScoringStore + ?Sized>(
    store: &S,
    shift_id: ShiftId,
    previous: &[ShiftPointRecord],
    step: PersistStep,
    err: &StoreError,
    remove_new: bool,
) -> ScoringError {
    log::warn!("Shift {shift_id} points {step} failed ({err}), restoring previous records");

    let restored = async {
        if remove_new {
            store.delete_shift_points(shift_id).await?;
        }
        if !previous.is_empty() {
            store.insert_shift_points(previous).await?;
        }
        Ok::<(), StoreError>(())
    }
    .await;

    match restored {
        Ok(()) => ScoringError::store(step, err),
        Err(restore_err) => {
            log::error!("Failed to restore points for shift {shift_id}: {restore_err}");
            ScoringError::Inconsistent {
                step,
                message: format!("{err}; restore failed: {restore_err}"),
            }
        }
    }
}
