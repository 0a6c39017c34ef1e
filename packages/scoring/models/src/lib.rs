#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Payroll scoring rule catalog and shift point record types.
//!
//! A scoring rule is a named, signed point adjustment (bonus or penalty)
//! that an administrator can attach to a lifeguard shift. The selected
//! rules are persisted as itemized [`ShiftPointRecord`]s and their sum is
//! stored on the shift itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Fixed coefficient applied to every itemized award.
///
/// Per-rule coefficients are not supported, so awarded points always
/// equal the rule's base quantity.
pub const DEFAULT_COEFFICIENT: f64 = 1.0;

/// Provenance comment written on itemized records created from the admin
/// panel.
pub const DEFAULT_PROVENANCE_COMMENT: &str = "Admin Panel Update";

/// Identifier of a scoring rule in the `points` catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RuleId(pub i64);

/// Identifier of a shift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShiftId(pub i64);

/// Identifier of a user row (not the external auth id).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for ShiftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, signed point adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRule {
    /// Catalog identifier.
    pub id: RuleId,
    /// Display name.
    pub name: String,
    /// Point delta. Negative values are penalties.
    pub quantity: i64,
    /// Optional free-form explanation.
    pub comment: Option<String>,
}

/// The parts of a shift row the scoring logic needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    /// Shift identifier.
    pub id: ShiftId,
    /// Lifeguard who worked the shift.
    pub user_id: UserId,
    /// Currently stored point total.
    pub points: Option<i64>,
}

/// Staff role as stored on the user profile.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Self-service access to own shifts and schedule.
    Lifeguard,
    /// Full administrative access.
    Admin,
    /// Beach operations director.
    Director,
    /// Officer on duty for the day.
    DutyOfficer,
}

impl Role {
    /// Whether this role may award or revoke shift points.
    #[must_use]
    pub const fn can_award_points(self) -> bool {
        matches!(self, Self::Admin | Self::Director | Self::DutyOfficer)
    }
}

/// The user performing a scoring change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    /// User row id, recorded as `awarded_by_user_id`.
    pub id: UserId,
    /// Profile role.
    pub role: Role,
}

/// One itemized point award, as stored in `lifeguard_shift_points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPointRecord {
    /// Shift the award belongs to.
    pub shift_id: ShiftId,
    /// Owner of the shift.
    pub user_id: UserId,
    /// Applied rule.
    pub rule_id: RuleId,
    /// Points credited after the coefficient.
    pub points_awarded: i64,
    /// Rule quantity at award time.
    pub base_points_from_rule: i64,
    /// Coefficient applied to the base points.
    pub coefficient_applied: f64,
    /// Administrator who made the award. Older rows may lack it.
    pub awarded_by: Option<UserId>,
    /// When the award was made.
    pub awarded_at: Option<DateTime<Utc>>,
    /// Provenance note.
    pub comment: Option<String>,
}

/// New value for the shift's stored total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftUpdate {
    /// Sum of the selected rules' quantities.
    pub points: i64,
}

/// Everything needed to replace a shift's itemized points and total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistencePlan {
    /// Target shift.
    pub shift_id: ShiftId,
    /// Total to write on the shift row.
    pub shift_update: ShiftUpdate,
    /// Itemized records that replace the existing set in full.
    pub records: Vec<ShiftPointRecord>,
}

/// How to treat selected rule ids that are missing from the catalog.
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
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LookupPolicy {
    /// Unknown ids contribute zero points and are logged.
    #[default]
    Lenient,
    /// Unknown ids reject the whole operation.
    Strict,
}

/// Scoring settings passed explicitly to every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    /// Unknown rule handling.
    pub lookup_policy: LookupPolicy,
    /// Comment stamped on each itemized record.
    pub provenance_comment: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lookup_policy: LookupPolicy::Lenient,
            provenance_comment: DEFAULT_PROVENANCE_COMMENT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_roles_can_award_points() {
        assert!(Role::Admin.can_award_points());
        assert!(Role::Director.can_award_points());
        assert!(Role::DutyOfficer.can_award_points());
        assert!(!Role::Lifeguard.can_award_points());
    }

    #[test]
    fn parses_roles_from_profile_strings() {
        assert_eq!("duty_officer".parse::<Role>().ok(), Some(Role::DutyOfficer));
        assert_eq!("lifeguard".parse::<Role>().ok(), Some(Role::Lifeguard));
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn lookup_policy_parses_case_insensitively() {
        assert_eq!("STRICT".parse::<LookupPolicy>().ok(), Some(LookupPolicy::Strict));
        assert_eq!(LookupPolicy::default(), LookupPolicy::Lenient);
    }
}
