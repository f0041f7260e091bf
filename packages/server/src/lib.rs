#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the school map application.
//!
//! Serves the located school records from the `DuckDB` store for the map
//! frontend.

mod handlers;

use std::path::Path;
use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};

/// Shared application state.
pub struct AppState {
    /// School store connection.
    /// `duckdb::Connection` is `Send` but not `Sync`, so a `Mutex` is needed.
    pub db: Mutex<duckdb::Connection>,
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/schools", web::get().to(handlers::schools)),
    );
}

/// Starts the school map API server on `BIND_ADDR:PORT`.
///
/// Opens the store at `db_path` and serves it until the server is
/// stopped. This is a regular async function; the caller provides the
/// runtime (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the store cannot be opened or the
/// HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(db_path: &Path) -> std::io::Result<()> {
    log::info!("Opening school store at {}...", db_path.display());
    let conn = school_map_database::open(db_path).map_err(std::io::Error::other)?;

    let state = web::Data::new(AppState {
        db: Mutex::new(conn),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
