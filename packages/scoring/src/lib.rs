#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shift point scoring for lifeguard payroll.
//!
//! Administrators attach a subset of scoring rules to a shift. This crate
//! turns that selection into a signed total, builds the itemized records
//! that justify it, and replaces the stored set through a [`ScoringStore`].
//! Stores with transactions replace the set atomically. The others run the
//! writes one by one with a compensating path when a step fails midway.

pub mod catalog;
pub mod plan;
pub mod store;

pub use catalog::{RuleCatalog, ShiftScoreSelection, compute_total, compute_total_with_policy};
pub use plan::build_persistence_plan;
pub use store::{SaveRequest, ScoringStore, StoreError, save_shift_points};

use lifeguard_scoring_models::{RuleId, Role, ShiftId};
use thiserror::Error;

/// Persistence step at which a store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PersistStep {
    /// Reading actor, shift, catalog or existing records.
    Load,
    /// Running delete, insert and update-total in one transaction.
    Replace,
    /// Removing the existing itemized records.
    Delete,
    /// Writing the new itemized records.
    Insert,
    /// Overwriting the shift's stored total.
    UpdateTotal,
}

/// Errors that can occur while scoring or saving shift points.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// A selected rule id is not in the catalog and the strict lookup
    /// policy is active.
    #[error("Unknown scoring rule {rule_id}")]
    UnknownRule {
        /// The unresolved rule id.
        rule_id: RuleId,
    },

    /// The acting user could not be resolved from its auth id.
    #[error("Actor not found for auth id '{auth_id}'")]
    ActorNotFound {
        /// External auth provider id that was looked up.
        auth_id: String,
    },

    /// The target shift does not exist.
    #[error("Shift {shift_id} not found")]
    ShiftNotFound {
        /// Requested shift.
        shift_id: ShiftId,
    },

    /// The acting user's role may not change shift points.
    #[error("Role '{role}' is not allowed to award shift points")]
    Forbidden {
        /// Role of the acting user.
        role: Role,
    },

    /// A backend step failed. Any partial write was rolled back or
    /// compensated.
    #[error("Store error during {step}: {message}")]
    Store {
        /// Step that failed.
        step: PersistStep,
        /// Backend error message.
        message: String,
    },

    /// A backend step failed and the compensating writes failed too, so
    /// the itemized records may not match the stored total.
    #[error("Inconsistent shift points after failed {step}: {message}")]
    Inconsistent {
        /// Step that originally failed.
        step: PersistStep,
        /// Original and compensation error messages.
        message: String,
    },
}

impl ScoringError {
    /// Wraps a backend error raised at `step`.
    #[must_use]
    pub fn store(step: PersistStep, err: &StoreError) -> Self {
        Self::Store {
            step,
            message: err.to_string(),
        }
    }

    /// Whether the error is caused by the request rather than the backend.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::UnknownRule { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_steps_display_kebab_case() {
        assert_eq!(PersistStep::UpdateTotal.to_string(), "update-total");
        assert_eq!(PersistStep::Replace.to_string(), "replace");
    }
}
