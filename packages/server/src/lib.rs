#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for lifeguard scoring and beach analytics.
//!
//! Serves the scoring catalog, per-shift point selections and their
//! replacement, plus the visitor analytics dashboard and the operations
//! summary. The schema is managed by the operations backend; this server
//! never migrates it.

pub mod config;
mod handlers;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use lifeguard_analytics_models::AnalyticsConfig;
use lifeguard_database::{DbScoringStore, db};
use lifeguard_scoring_models::ScoringConfig;
use std::sync::Arc;
use switchy_database::Database;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Database connection.
    pub db: Arc<dyn Database>,
    /// Analytics policy constants.
    pub analytics: AnalyticsConfig,
    /// Scoring policy.
    pub scoring: ScoringConfig,
}

impl AppState {
    /// Scoring persistence over the shared connection.
    #[must_use]
    pub fn scoring_store(&self) -> DbScoringStore {
        DbScoringStore::new(Arc::clone(&self.db))
    }
}

/// Starts the lifeguard operations API server.
///
/// Reads [`ServerConfig`] from the environment, connects to the database
/// and starts the Actix-Web HTTP server. The caller provides the async
/// runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the database connection fails.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let config = ServerConfig::from_env();
    log::info!(
        "Lookup policy {}, visitor log cap {}",
        config.scoring.lookup_policy,
        config.analytics.log_row_cap
    );

    log::info!("Connecting to database...");
    let db_conn = db::connect_from_env()
        .await
        .expect("Failed to connect to database");

    let state = web::Data::new(AppState {
        db: Arc::from(db_conn),
        analytics: config.analytics,
        scoring: config.scoring,
    });

    let bind_addr = config.bind_addr;
    let port = config.port;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/scoring/rules", web::get().to(handlers::scoring_rules))
                    .route("/scoring/preview", web::post().to(handlers::preview_total))
                    .route("/shifts/{id}/points", web::get().to(handlers::shift_points))
                    .route(
                        "/shifts/{id}/points",
                        web::put().to(handlers::save_shift_points),
                    )
                    .route(
                        "/analytics/dashboard",
                        web::get().to(handlers::analytics_dashboard),
                    )
                    .route(
                        "/analytics/operations",
                        web::get().to(handlers::analytics_operations),
                    ),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
