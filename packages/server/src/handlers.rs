//! HTTP handler functions for the lifeguard operations API.

use std::collections::BTreeSet;

use actix_web::{HttpResponse, http::StatusCode, web};
use chrono::Utc;
use lifeguard_analytics::{AnalyticsError, build_dashboard, resolve_range, summarize_operations};
use lifeguard_analytics_models::DateRange;
use lifeguard_database::{analytics as analytics_queries, queries};
use lifeguard_scoring::{
    RuleCatalog, SaveRequest, ScoringError, ShiftScoreSelection, compute_total_with_policy,
};
use lifeguard_scoring_models::{RuleId, ShiftId};
use lifeguard_server_models::{
    AnalyticsQueryParams, ApiError, ApiHealth, ApiPreview, ApiSaveResult, ApiScoringRule,
    ApiShiftPoint, ApiShiftPoints, PreviewRequest, SavePointsRequest,
};

use crate::AppState;

fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ApiError {
        error: message.into(),
    })
}

fn internal_error(context: &str, err: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("{context}: {err}");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, context)
}

/// Maps a scoring failure to its response status.
const fn scoring_status(err: &ScoringError) -> StatusCode {
    match err {
        ScoringError::UnknownRule { .. } => StatusCode::BAD_REQUEST,
        ScoringError::ActorNotFound { .. } | ScoringError::Forbidden { .. } => {
            StatusCode::FORBIDDEN
        }
        ScoringError::ShiftNotFound { .. } => StatusCode::NOT_FOUND,
        ScoringError::Store { .. } | ScoringError::Inconsistent { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn scoring_error_response(err: &ScoringError) -> HttpResponse {
    let status = scoring_status(err);
    if status.is_server_error() {
        if matches!(err, ScoringError::Inconsistent { .. }) {
            log::error!("Shift points left inconsistent: {err}");
        }
        return internal_error("Failed to save shift points", err);
    }
    log::warn!("Rejected scoring request: {err}");
    error_response(status, err.to_string())
}

fn request_range(params: &AnalyticsQueryParams) -> Result<DateRange, AnalyticsError> {
    resolve_range(
        params.start.as_deref(),
        params.end.as_deref(),
        params.preset.as_deref(),
        Utc::now().date_naive(),
    )
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/scoring/rules`
///
/// Returns the scoring rule catalog ordered by id.
pub async fn scoring_rules(state: web::Data<AppState>) -> HttpResponse {
    match queries::load_scoring_rules(state.db.as_ref()).await {
        Ok(rules) => HttpResponse::Ok().json(
            rules
                .into_iter()
                .map(ApiScoringRule::from)
                .collect::<Vec<_>>(),
        ),
        Err(e) => internal_error("Failed to load scoring rules", &e),
    }
}

/// `GET /api/shifts/{id}/points`
///
/// Returns the shift's selected rules, the total recomputed against the
/// current catalog and the itemized records.
pub async fn shift_points(state: web::Data<AppState>, path: web::Path<i64>) -> HttpResponse {
    let shift_id = ShiftId(path.into_inner());
    let db = state.db.as_ref();

    let shift = match queries::load_shift(db, shift_id).await {
        Ok(Some(shift)) => shift,
        Ok(None) => {
            return error_response(StatusCode::NOT_FOUND, format!("Shift {shift_id} not found"));
        }
        Err(e) => return internal_error("Failed to load shift", &e),
    };

    let (rules, records) = match tokio::try_join!(
        queries::load_scoring_rules(db),
        queries::load_shift_points(db, shift_id)
    ) {
        Ok(loaded) => loaded,
        Err(e) => return internal_error("Failed to load shift points", &e),
    };

    let catalog = RuleCatalog::new(rules);
    let rule_ids: Vec<RuleId> = records.iter().map(|r| r.rule_id).collect();
    let selection = ShiftScoreSelection::from_existing(shift_id, &rule_ids, &catalog);

    HttpResponse::Ok().json(ApiShiftPoints {
        shift_id,
        rule_ids: selection.rule_ids().to_vec(),
        total: selection.total(),
        stored_total: shift.points,
        records: records.into_iter().map(ApiShiftPoint::from).collect(),
    })
}

/// `PUT /api/shifts/{id}/points`
///
/// Replaces the shift's itemized points and stored total with the given
/// selection.
pub async fn save_shift_points(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<SavePointsRequest>,
) -> HttpResponse {
    let body = body.into_inner();
    let request = SaveRequest {
        shift_id: ShiftId(path.into_inner()),
        actor_auth_id: body.actor_auth_id,
        rule_ids: body.rule_ids,
    };

    let store = state.scoring_store();
    match lifeguard_scoring::save_shift_points(&store, &request, &state.scoring, Utc::now()).await
    {
        Ok(plan) => HttpResponse::Ok().json(ApiSaveResult {
            shift_id: plan.shift_id,
            points: plan.shift_update.points,
            record_count: plan.records.len(),
        }),
        Err(e) => scoring_error_response(&e),
    }
}

/// `POST /api/scoring/preview`
///
/// Totals a candidate selection without writing anything.
pub async fn preview_total(
    state: web::Data<AppState>,
    body: web::Json<PreviewRequest>,
) -> HttpResponse {
    let rules = match queries::load_scoring_rules(state.db.as_ref()).await {
        Ok(rules) => rules,
        Err(e) => return internal_error("Failed to load scoring rules", &e),
    };
    let catalog = RuleCatalog::new(rules);

    match compute_total_with_policy(&body.rule_ids, &catalog, state.scoring.lookup_policy) {
        Ok(total) => {
            let unknown_rule_ids = body
                .rule_ids
                .iter()
                .copied()
                .filter(|id| catalog.lookup(*id).is_none())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            HttpResponse::Ok().json(ApiPreview {
                total,
                unknown_rule_ids,
            })
        }
        Err(e) => scoring_error_response(&e),
    }
}

/// `GET /api/analytics/dashboard`
///
/// Builds the beach analytics dashboard for `?start=&end=` or `?preset=`.
pub async fn analytics_dashboard(
    state: web::Data<AppState>,
    params: web::Query<AnalyticsQueryParams>,
) -> HttpResponse {
    let range = match request_range(&params) {
        Ok(range) => range,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let db = state.db.as_ref();
    let config = &state.analytics;

    match tokio::try_join!(
        analytics_queries::load_daily_totals(db, &range),
        analytics_queries::load_post_aggregates(db, &range),
        analytics_queries::load_visitor_logs(db, &range, config.log_row_cap)
    ) {
        Ok((daily, posts, logs)) => {
            HttpResponse::Ok().json(build_dashboard(range, &daily, &posts, &logs, config))
        }
        Err(e) => internal_error("Failed to load analytics", &e),
    }
}

/// `GET /api/analytics/operations`
///
/// Summarizes shifts, reports and incidents for `?start=&end=` or
/// `?preset=`.
pub async fn analytics_operations(
    state: web::Data<AppState>,
    params: web::Query<AnalyticsQueryParams>,
) -> HttpResponse {
    let range = match request_range(&params) {
        Ok(range) => range,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    let db = state.db.as_ref();
    let cap = state.analytics.log_row_cap;

    match tokio::try_join!(
        analytics_queries::load_posts(db),
        analytics_queries::load_shift_activity(db, &range, cap),
        analytics_queries::load_shift_reports(db, &range, cap),
        analytics_queries::load_report_incidents(db, &range, cap)
    ) {
        Ok((posts, shifts, reports, incidents)) => HttpResponse::Ok().json(summarize_operations(
            &shifts, &reports, &incidents, &posts,
        )),
        Err(e) => internal_error("Failed to load operations summary", &e),
    }
}

#[cfg(test)]
mod tests {
    use lifeguard_scoring::PersistStep;
    use lifeguard_scoring_models::Role;

    use super::*;

    #[test]
    fn scoring_errors_map_to_statuses() {
        assert_eq!(
            scoring_status(&ScoringError::UnknownRule { rule_id: RuleId(1) }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            scoring_status(&ScoringError::Forbidden {
                role: Role::Lifeguard
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            scoring_status(&ScoringError::ActorNotFound {
                auth_id: "x".to_string()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            scoring_status(&ScoringError::ShiftNotFound {
                shift_id: ShiftId(1)
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            scoring_status(&ScoringError::Inconsistent {
                step: PersistStep::Insert,
                message: "down".to_string()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn server_errors_hide_details() {
        let response = scoring_error_response(&ScoringError::Store {
            step: PersistStep::Delete,
            message: "connection reset".to_string(),
        });
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn bad_range_is_rejected() {
        let params = AnalyticsQueryParams {
            start: Some("2024-06-03".to_string()),
            end: Some("2024-06-01".to_string()),
            preset: None,
        };
        assert!(request_range(&params).is_err());
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let response = health().await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
