//! Scoring queries: rule catalog, shifts, itemized shift points and the
//! acting user.

use chrono::{DateTime, NaiveDateTime, Utc};
use lifeguard_scoring_models::{
    Actor, PersistencePlan, Role, RuleId, ScoringRule, Shift, ShiftId, ShiftPointRecord, UserId,
};
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};

use crate::DbError;

/// Loads the scoring rule catalog ordered by id.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_scoring_rules(db: &dyn Database) -> Result<Vec<ScoringRule>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id_balls::bigint AS id,
                    COALESCE(name_balls, '') AS name,
                    quantity::bigint AS quantity,
                    comment_balls AS comment
             FROM points
             ORDER BY id_balls",
            &[],
        )
        .await?;

    let rules = rows
        .iter()
        .map(|row| ScoringRule {
            id: RuleId(row.to_value("id").unwrap_or(0)),
            name: row.to_value("name").unwrap_or_default(),
            quantity: row.to_value("quantity").unwrap_or(0),
            comment: row.to_value("comment").unwrap_or(None),
        })
        .collect::<Vec<_>>();

    log::debug!("Loaded {} scoring rules", rules.len());
    Ok(rules)
}

/// Loads a shift by id, or `None` if it does not exist.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_shift(db: &dyn Database, shift_id: ShiftId) -> Result<Option<Shift>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id::bigint AS id, user_id::bigint AS user_id, points::bigint AS points
             FROM shifts
             WHERE id = $1::bigint",
            &[DatabaseValue::Int64(shift_id.0)],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let user_id: i64 = row.to_value("user_id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse user_id of shift {shift_id}: {e}"),
    })?;

    Ok(Some(Shift {
        id: shift_id,
        user_id: UserId(user_id),
        points: row.to_value("points").unwrap_or(None),
    }))
}

/// Loads the itemized point records of a shift in insertion order.
///
/// Nullable columns stay `None` so the records can be written back
/// unchanged.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_shift_points(
    db: &dyn Database,
    shift_id: ShiftId,
) -> Result<Vec<ShiftPointRecord>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT user_id::bigint AS user_id,
                    rule_id::bigint AS rule_id,
                    points_awarded::bigint AS points_awarded,
                    base_points_from_rule::bigint AS base_points_from_rule,
                    COALESCE(coefficient_applied, 1.0)::float8 AS coefficient_applied,
                    awarded_by_user_id::bigint AS awarded_by_user_id,
                    award_datetime::timestamp AS award_datetime,
                    comment
             FROM lifeguard_shift_points
             WHERE shift_id = $1::bigint
             ORDER BY id",
            &[DatabaseValue::Int64(shift_id.0)],
        )
        .await?;

    let records = rows
        .iter()
        .map(|row| {
            let awarded_by: Option<i64> = row.to_value("awarded_by_user_id").unwrap_or(None);
            let awarded_at: Option<NaiveDateTime> =
                row.to_value("award_datetime").unwrap_or(None);
            ShiftPointRecord {
                shift_id,
                user_id: UserId(row.to_value("user_id").unwrap_or(0)),
                rule_id: RuleId(row.to_value("rule_id").unwrap_or(0)),
                points_awarded: row.to_value("points_awarded").unwrap_or(0),
                base_points_from_rule: row.to_value("base_points_from_rule").unwrap_or(0),
                coefficient_applied: row.to_value("coefficient_applied").unwrap_or(1.0),
                awarded_by: awarded_by.map(UserId),
                awarded_at: awarded_at
                    .map(|at| DateTime::<Utc>::from_naive_utc_and_offset(at, Utc)),
                comment: row.to_value("comment").unwrap_or(None),
            }
        })
        .collect();

    Ok(records)
}

/// Loads the rule ids currently selected for a shift.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub async fn load_selected_rule_ids(
    db: &dyn Database,
    shift_id: ShiftId,
) -> Result<Vec<RuleId>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT rule_id::bigint AS rule_id
             FROM lifeguard_shift_points
             WHERE shift_id = $1::bigint
             ORDER BY id",
            &[DatabaseValue::Int64(shift_id.0)],
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| RuleId(row.to_value("rule_id").unwrap_or(0)))
        .collect())
}

fn parse_role(raw: Option<&str>, user_id: i64) -> Role {
    raw.and_then(|r| r.parse::<Role>().ok()).unwrap_or_else(|| {
        log::warn!("User {user_id} has unknown role {raw:?}, treating as lifeguard");
        Role::Lifeguard
    })
}

/// Resolves an external auth id to the acting user and their role.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or the row cannot be decoded.
pub async fn resolve_actor(db: &dyn Database, auth_id: &str) -> Result<Option<Actor>, DbError> {
    let rows = db
        .query_raw_params(
            "SELECT id::bigint AS id, role FROM users WHERE auth_id = $1 LIMIT 1",
            &[DatabaseValue::String(auth_id.to_string())],
        )
        .await?;

    let Some(row) = rows.first() else {
        return Ok(None);
    };

    let id: i64 = row.to_value("id").map_err(|e| DbError::Conversion {
        message: format!("Failed to parse user id for auth id '{auth_id}': {e}"),
    })?;
    let role: Option<String> = row.to_value("role").unwrap_or(None);

    Ok(Some(Actor {
        id: UserId(id),
        role: parse_role(role.as_deref(), id),
    }))
}

/// Deletes every itemized point record of a shift.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails.
pub async fn delete_shift_points(db: &dyn Database, shift_id: ShiftId) -> Result<u64, DbError> {
    let deleted = db
        .exec_raw_params(
            "DELETE FROM lifeguard_shift_points WHERE shift_id = $1::bigint",
            &[DatabaseValue::Int64(shift_id.0)],
        )
        .await?;
    Ok(deleted)
}

/// Inserts itemized point records.
///
/// # Errors
///
/// Returns [`DbError`] on the first failing insert. Rows inserted before it
/// stay in place.
pub async fn insert_shift_points(
    db: &dyn Database,
    records: &[ShiftPointRecord],
) -> Result<u64, DbError> {
    let mut inserted = 0u64;

    for record in records {
        inserted += db
            .exec_raw_params(
                "INSERT INTO lifeguard_shift_points (
                    shift_id, user_id, rule_id, points_awarded,
                    base_points_from_rule, coefficient_applied,
                    awarded_by_user_id, award_datetime, comment
                 ) VALUES (
                    $1::bigint, $2::bigint, $3::bigint, $4::bigint,
                    $5::bigint, $6::float8, $7::bigint, $8::timestamp, $9
                 )",
                &[
                    DatabaseValue::Int64(record.shift_id.0),
                    DatabaseValue::Int64(record.user_id.0),
                    DatabaseValue::Int64(record.rule_id.0),
                    DatabaseValue::Int64(record.points_awarded),
                    DatabaseValue::Int64(record.base_points_from_rule),
                    DatabaseValue::Real64(record.coefficient_applied),
                    record
                        .awarded_by
                        .map_or(DatabaseValue::Null, |id| DatabaseValue::Int64(id.0)),
                    record
                        .awarded_at
                        .map_or(DatabaseValue::Null, |at| DatabaseValue::DateTime(at.naive_utc())),
                    record
                        .comment
                        .clone()
                        .map_or(DatabaseValue::Null, DatabaseValue::String),
                ],
            )
            .await?;
    }

    Ok(inserted)
}

/// Overwrites a shift's stored point total.
///
/// # Errors
///
/// Returns [`DbError`] if the statement fails or no shift was updated.
pub async fn update_shift_total(
    db: &dyn Database,
    shift_id: ShiftId,
    points: i64,
) -> Result<(), DbError> {
    let updated = db
        .exec_raw_params(
            "UPDATE shifts SET points = $2::bigint, updated_at = NOW() WHERE id = $1::bigint",
            &[DatabaseValue::Int64(shift_id.0), DatabaseValue::Int64(points)],
        )
        .await?;

    if updated == 0 {
        return Err(DbError::Conversion {
            message: format!("Shift {shift_id} vanished before its total was updated"),
        });
    }

    Ok(())
}

/// Replaces a shift's itemized records and stored total in one
/// transaction. Nothing is kept if any step fails.
///
/// # Errors
///
/// Returns [`DbError`] if a statement or the commit fails. The transaction
/// is rolled back before returning.
pub async fn replace_shift_points(
    db: &dyn Database,
    plan: &PersistencePlan,
) -> Result<(), DbError> {
    let txn = db.begin_transaction().await?;

    let result = async {
        let deleted = delete_shift_points(txn.as_ref(), plan.shift_id).await?;
        let inserted = insert_shift_points(txn.as_ref(), &plan.records).await?;
        update_shift_total(txn.as_ref(), plan.shift_id, plan.shift_update.points).await?;
        Ok::<_, DbError>((deleted, inserted))
    }
    .await;

    match result {
        Ok((deleted, inserted)) => {
            txn.commit().await?;
            log::debug!(
                "Replaced points for shift {}: {deleted} deleted, {inserted} inserted",
                plan.shift_id
            );
            Ok(())
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                log::error!(
                    "Failed to roll back points for shift {}: {rollback_err}",
                    plan.shift_id
                );
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_parse() {
        assert_eq!(parse_role(Some("duty_officer"), 1), Role::DutyOfficer);
        assert_eq!(parse_role(Some("admin"), 1), Role::Admin);
    }

    #[test]
    fn missing_or_unknown_role_is_least_privileged() {
        assert_eq!(parse_role(None, 1), Role::Lifeguard);
        assert_eq!(parse_role(Some("superuser"), 1), Role::Lifeguard);
    }
}
