//! [`ScoringStore`] backed by the relational database.

use std::sync::Arc;

use async_trait::async_trait;
use lifeguard_scoring::{ScoringStore, StoreError};
use lifeguard_scoring_models::{
    Actor, PersistencePlan, RuleId, ScoringRule, Shift, ShiftId, ShiftPointRecord,
};
use switchy_database::Database;

use crate::queries;

/// Scoring persistence over a shared database connection.
#[derive(Clone)]
pub struct DbScoringStore {
    db: Arc<dyn Database>,
}

impl DbScoringStore {
    /// Wraps a shared connection.
    #[must_use]
    pub const fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ScoringStore for DbScoringStore {
    async fn load_rules(&self) -> Result<Vec<ScoringRule>, StoreError> {
        Ok(queries::load_scoring_rules(self.db.as_ref()).await?)
    }

    async fn load_shift(&self, shift_id: ShiftId) -> Result<Option<Shift>, StoreError> {
        Ok(queries::load_shift(self.db.as_ref(), shift_id).await?)
    }

    async fn load_selected_rule_ids(&self, shift_id: ShiftId) -> Result<Vec<RuleId>, StoreError> {
        Ok(queries::load_selected_rule_ids(self.db.as_ref(), shift_id).await?)
    }

    async fn load_shift_points(
        &self,
        shift_id: ShiftId,
    ) -> Result<Vec<ShiftPointRecord>, StoreError> {
        Ok(queries::load_shift_points(self.db.as_ref(), shift_id).await?)
    }

    async fn resolve_actor(&self, auth_id: &str) -> Result<Option<Actor>, StoreError> {
        Ok(queries::resolve_actor(self.db.as_ref(), auth_id).await?)
    }

    async fn delete_shift_points(&self, shift_id: ShiftId) -> Result<u64, StoreError> {
        Ok(queries::delete_shift_points(self.db.as_ref(), shift_id).await?)
    }

    async fn insert_shift_points(&self, records: &[ShiftPointRecord]) -> Result<u64, StoreError> {
        Ok(queries::insert_shift_points(self.db.as_ref(), records).await?)
    }

    async fn update_shift_total(&self, shift_id: ShiftId, points: i64) -> Result<(), StoreError> {
        Ok(queries::update_shift_total(self.db.as_ref(), shift_id, points).await?)
    }

    async fn replace_shift_points(
        &self,
        plan: &PersistencePlan,
    ) -> Option<Result<(), StoreError>> {
        Some(
            queries::replace_shift_points(self.db.as_ref(), plan)
                .await
                .map_err(Into::into),
        )
    }
}
