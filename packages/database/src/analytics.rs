//! Analytics reads: pre-summed views, raw visitor logs and the shift
//! activity behind the operations summary.
//!
//! Every range-filtered query takes an inclusive [`DateRange`]. Raw row
//! reads are capped by `LIMIT`, which bounds how representative the sample
//! is when the range holds more rows than the cap.

use chrono::NaiveDateTime;
use lifeguard_analytics_models::{
    DailyTotal, DateRange, IncidentRecord, PostAggregate, PostInfo, ShiftActivity,
    ShiftReportSummary, VisitorLogEntry,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::{DbError, day_start, next_day_start};

fn date_params(range: &DateRange) -> [DatabaseValue; 2] {
    [
        DatabaseValue::DateTime(day_start(range.start)),
        DatabaseValue::DateTime(day_start(range.end)),
    ]
}

fn timestamp_params(range: &DateRange, cap: u32) -> [DatabaseValue; 3] {
    [
        DatabaseValue::DateTime(day_start(range.start)),
        DatabaseValue::DateTime(next_day_start(range.end)),
        DatabaseValue::Int64(i64::from(cap)),
    ]
}

fn row_date(row: &switchy_database::Row, column: &str) -> Result<chrono::NaiveDate, DbError> {
    let value: NaiveDateTime = row.to_value(column).map_err(|e| DbError::Conversion {
        message: format!("Failed to parse {column}: {e}"),
    })?;
    Ok(value.date())
}

/// Loads the per-day visitor totals from `view_analytics_daily`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a date cannot be decoded.
pub async fn load_daily_totals(
    db: &dyn Database,
    range: &DateRange,
) -> Result<Vec<DailyTotal>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT date::timestamp AS date,
                    COALESCE(total_visitors, 0)::bigint AS total_visitors
             FROM view_analytics_daily
             WHERE date >= $1::timestamp AND date <= $2::timestamp
             ORDER BY date",
            &date_params(range),
        )
        .await?;

    rows.iter()
        .map(|row| {
            Ok(DailyTotal {
                date: row_date(row, "date")?,
                total_visitors: row.to_value("total_visitors").unwrap_or(0),
            })
        })
        .collect()
}

/// Loads per-post rows from `view_analytics_by_post` joined with the post
/// name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_post_aggregates(
    db: &dyn Database,
    range: &DateRange,
) -> Result<Vec<PostAggregate>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT v.post_id::bigint AS post_id,
                    p.name AS name,
                    COALESCE(v.total_visitors, 0)::bigint AS total_visitors,
                    COALESCE(v.avg_water, 0)::float8 AS avg_water,
                    COALESCE(v.avg_land, 0)::float8 AS avg_land
             FROM view_analytics_by_post v
             LEFT JOIN posts p ON p.id = v.post_id
             WHERE v.post_id IS NOT NULL
               AND v.date >= $1::timestamp AND v.date <= $2::timestamp
             ORDER BY v.date, v.post_id",
            &date_params(range),
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| PostAggregate {
            post_id: row.to_value("post_id").unwrap_or(0),
            name: row.to_value("name").unwrap_or(None),
            total_visitors: row.to_value("total_visitors").unwrap_or(0),
            avg_water: row.to_value("avg_water").unwrap_or(0.0),
            avg_land: row.to_value("avg_land").unwrap_or(0.0),
        })
        .collect())
}

/// Loads raw per-slot visitor logs, at most `cap` rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a date cannot be decoded.
pub async fn load_visitor_logs(
    db: &dyn Database,
    range: &DateRange,
    cap: u32,
) -> Result<Vec<VisitorLogEntry>, DbError> {
    let [start, end] = date_params(range);
    let rows = db
        .query_raw_params(
            "SELECT post_id::bigint AS post_id,
                    date::timestamp AS date,
                    time_slot::text AS time_slot,
                    COALESCE(land_count, 0)::bigint AS land_count,
                    COALESCE(water_count, 0)::bigint AS water_count
             FROM beach_analytics_logs
             WHERE date >= $1::timestamp AND date <= $2::timestamp
             ORDER BY date, time_slot
             LIMIT $3::bigint",
            &[start, end, DatabaseValue::Int64(i64::from(cap))],
        )
        .await?;

    let logs = rows
        .iter()
        .map(|row| {
            Ok(VisitorLogEntry {
                post_id: row.to_value("post_id").unwrap_or(None),
                date: row_date(row, "date")?,
                time_slot: row.to_value("time_slot").unwrap_or_default(),
                land_count: row.to_value("land_count").unwrap_or(0),
                water_count: row.to_value("water_count").unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, DbError>>()?;

    log::debug!(
        "Loaded {} visitor logs for {}..{} (cap {cap})",
        logs.len(),
        range.start,
        range.end
    );
    Ok(logs)
}

/// Loads every post with its complexity coefficient.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_posts(db: &dyn Database) -> Result<Vec<PostInfo>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id::bigint AS id, name,
                    complexity_coefficient::float8 AS complexity_coefficient
             FROM posts
             ORDER BY id",
            &[],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| PostInfo {
            id: row.to_value("id").unwrap_or(0),
            name: row.to_value("name").unwrap_or(None),
            complexity_coefficient: row.to_value("complexity_coefficient").unwrap_or(None),
        })
        .collect())
}

/// Loads shifts that started in the range, at most `cap` rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_shift_activity(
    db: &dyn Database,
    range: &DateRange,
    cap: u32,
) -> Result<Vec<ShiftActivity>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id::bigint AS id, post_id::bigint AS post_id,
                    rounded_work_hours::float8 AS rounded_work_hours
             FROM shifts
             WHERE start_time >= $1::timestamp AND start_time < $2::timestamp
             ORDER BY start_time
             LIMIT $3::bigint",
            &timestamp_params(range, cap),
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| ShiftActivity {
            id: row.to_value("id").unwrap_or(0),
            post_id: row.to_value("post_id").unwrap_or(0),
            rounded_work_hours: row.to_value("rounded_work_hours").unwrap_or(None),
        })
        .collect())
}

/// Loads shift reports submitted in the range, at most `cap` rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_shift_reports(
    db: &dyn Database,
    range: &DateRange,
    cap: u32,
) -> Result<Vec<ShiftReportSummary>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id::bigint AS id, shift_id::bigint AS shift_id,
                    COALESCE(people_on_beach_estimated, 0)::bigint AS people_on_beach,
                    COALESCE(people_in_water_estimated, 0)::bigint AS people_in_water
             FROM shift_reports
             WHERE report_submitted_at >= $1::timestamp AND report_submitted_at < $2::timestamp
             ORDER BY report_submitted_at
             LIMIT $3::bigint",
            &timestamp_params(range, cap),
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| ShiftReportSummary {
            id: row.to_value("id").unwrap_or(0),
            shift_id: row.to_value("shift_id").unwrap_or(0),
            people_on_beach: row.to_value("people_on_beach").unwrap_or(0),
            people_in_water: row.to_value("people_in_water").unwrap_or(0),
        })
        .collect())
}

/// Loads incidents filed under reports submitted in the range, at most
/// `cap` rows.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_report_incidents(
    db: &dyn Database,
    range: &DateRange,
    cap: u32,
) -> Result<Vec<IncidentRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT i.shift_report_id::bigint AS shift_report_id, i.incident_type
             FROM report_incidents i
             JOIN shift_reports r ON r.id = i.shift_report_id
             WHERE r.report_submitted_at >= $1::timestamp
               AND r.report_submitted_at < $2::timestamp
             ORDER BY i.id
             LIMIT $3::bigint",
            &timestamp_params(range, cap),
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| IncidentRecord {
            shift_report_id: row.to_value("shift_report_id").unwrap_or(0),
            incident_type: row.to_value("incident_type").unwrap_or(None),
        })
        .collect())
}
