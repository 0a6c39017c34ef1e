#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Database connection and queries for lifeguard scoring and beach
//! analytics.
//!
//! The schema is owned by the operations backend, so this crate only reads
//! and writes existing tables and views. All queries are raw SQL through
//! `query_raw_params()` with explicit casts so parameter and column types
//! line up with the binary protocol.

pub mod analytics;
pub mod db;
pub mod queries;
pub mod store;

pub use store::DbScoringStore;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database query error.
    #[error("Database error: {0}")]
    Database(#[from] switchy_database::DatabaseError),

    /// Data conversion error.
    #[error("Data conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Midnight at the start of `date`, for binding against date columns.
pub(crate) fn day_start(date: chrono::NaiveDate) -> chrono::NaiveDateTime {
    date.and_hms_opt(0, 0, 0).unwrap_or_default()
}

/// Midnight at the start of the day after `date`, for exclusive upper
/// bounds on timestamp columns.
pub(crate) fn next_day_start(date: chrono::NaiveDate) -> chrono::NaiveDateTime {
    day_start(date.succ_opt().unwrap_or(date))
}
