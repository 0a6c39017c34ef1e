#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the lifeguard operations server.
//!
//! Analytics responses reuse the analytics result types directly. The
//! types here cover the scoring endpoints and shared envelopes, kept apart
//! from the store row types so the API contract can evolve on its own.

use chrono::{DateTime, Utc};
use lifeguard_scoring_models::{RuleId, ScoringRule, ShiftId, ShiftPointRecord, UserId};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Error envelope returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

/// A scoring rule as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScoringRule {
    /// Rule id.
    pub id: RuleId,
    /// Display name.
    pub name: String,
    /// Signed point value.
    pub quantity: i64,
    /// Free-form description.
    pub comment: Option<String>,
}

impl From<ScoringRule> for ApiScoringRule {
    fn from(rule: ScoringRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            quantity: rule.quantity,
            comment: rule.comment,
        }
    }
}

/// One itemized point record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShiftPoint {
    /// Rule that was applied.
    pub rule_id: RuleId,
    /// Points granted.
    pub points_awarded: i64,
    /// Multiplier applied to the rule quantity.
    pub coefficient_applied: f64,
    /// Administrator who awarded the points, if recorded.
    pub awarded_by: Option<UserId>,
    /// When the points were awarded, if recorded.
    pub awarded_at: Option<DateTime<Utc>>,
    /// Provenance note.
    pub comment: Option<String>,
}

impl From<ShiftPointRecord> for ApiShiftPoint {
    fn from(record: ShiftPointRecord) -> Self {
        Self {
            rule_id: record.rule_id,
            points_awarded: record.points_awarded,
            coefficient_applied: record.coefficient_applied,
            awarded_by: record.awarded_by,
            awarded_at: record.awarded_at,
            comment: record.comment,
        }
    }
}

/// The current point selection of a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiShiftPoints {
    /// Shift id.
    pub shift_id: ShiftId,
    /// Selected rule ids.
    pub rule_ids: Vec<RuleId>,
    /// Total recomputed from the current catalog.
    pub total: i64,
    /// Total stored on the shift, which may lag the catalog.
    pub stored_total: Option<i64>,
    /// Itemized records.
    pub records: Vec<ApiShiftPoint>,
}

/// Body of `PUT /api/shifts/{id}/points`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePointsRequest {
    /// External auth id of the acting administrator.
    ///
    /// Taken from the body as-is and trusted for the role check. A
    /// deployment must fill it from the authenticated session rather than
    /// accept a client-supplied value.
    pub actor_auth_id: String,
    /// Full replacement selection.
    pub rule_ids: Vec<RuleId>,
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSaveResult {
    /// Shift id.
    pub shift_id: ShiftId,
    /// New stored total.
    pub points: i64,
    /// Number of itemized records written.
    pub record_count: usize,
}

/// Body of `POST /api/scoring/preview`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    /// Candidate selection.
    pub rule_ids: Vec<RuleId>,
}

/// Total for a candidate selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPreview {
    /// Sum of the known rules' quantities.
    pub total: i64,
    /// Selected ids missing from the catalog.
    pub unknown_rule_ids: Vec<RuleId>,
}

/// Query parameters shared by the analytics endpoints.
///
/// Either `start` and `end` (`YYYY-MM-DD`, inclusive) or `preset` may be
/// given. Explicit dates take precedence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQueryParams {
    /// First day.
    pub start: Option<String>,
    /// Last day.
    pub end: Option<String>,
    /// Named range such as `last_30_days`.
    pub preset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_request_uses_camel_case() {
        let body: SavePointsRequest =
            serde_json::from_str(r#"{"actorAuthId":"auth-1","ruleIds":[3,4]}"#).unwrap();
        assert_eq!(body.actor_auth_id, "auth-1");
        assert_eq!(body.rule_ids, vec![RuleId(3), RuleId(4)]);
    }

    #[test]
    fn preview_serializes_plain_ids() {
        let json = serde_json::to_value(ApiPreview {
            total: 7,
            unknown_rule_ids: vec![RuleId(9)],
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"total": 7, "unknownRuleIds": [9]}));
    }

    #[test]
    fn legacy_record_serializes_missing_fields_as_null() {
        let point = ApiShiftPoint::from(ShiftPointRecord {
            shift_id: ShiftId(3),
            user_id: UserId(8),
            rule_id: RuleId(2),
            points_awarded: 5,
            base_points_from_rule: 5,
            coefficient_applied: 1.0,
            awarded_by: None,
            awarded_at: None,
            comment: None,
        });
        let json = serde_json::to_value(point).unwrap();
        assert_eq!(json["awardedBy"], serde_json::Value::Null);
        assert_eq!(json["awardedAt"], serde_json::Value::Null);
        assert_eq!(json["comment"], serde_json::Value::Null);
        assert_eq!(json["ruleId"], 2);
    }
}
