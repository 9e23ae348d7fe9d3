//! Request-level API over the storefront core.
//!
//! # Responsibility
//! - Map method + path + JSON body to one entity-service call.
//! - Translate results and errors into status codes and JSON bodies.
//!
//! # Invariants
//! - Request handling never panics; every failure becomes a response.
//! - One request runs on one storage session; nothing is cached between
//!   requests.

pub mod config;
mod handlers;
pub mod response;
pub mod router;

pub use config::ApiConfig;
pub use response::ApiResponse;
pub use router::{match_route, ApiRequest, Method, Route};

use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;
use storefront_core::db::open_db;

/// Handles one request on an already-open, migrated connection.
pub fn handle(conn: &Connection, request: &ApiRequest) -> ApiResponse {
    let started_at = Instant::now();
    let Some(route) = match_route(&request.path) else {
        info!(
            "event=api_request module=api status=no_route method={}",
            request.method
        );
        return ApiResponse::route_not_found(&request.path);
    };

    let response = handlers::dispatch(conn, route, request).unwrap_or_else(ApiResponse::from);
    info!(
        "event=api_request module=api status={} method={} route={:?} duration_ms={}",
        response.status,
        request.method,
        route,
        started_at.elapsed().as_millis()
    );
    response
}

/// Opens the configured database, handles one request, and releases the
/// connection.
pub fn handle_request(config: &ApiConfig, request: &ApiRequest) -> ApiResponse {
    match open_db(&config.db_path) {
        Ok(conn) => handle(&conn, request),
        Err(err) => {
            error!("event=api_request module=api status=error error_code=db_open_failed error={err}");
            ApiResponse::message(
                response::STATUS_INTERNAL_ERROR,
                format!("Storage unavailable: {err}"),
            )
        }
    }
}
