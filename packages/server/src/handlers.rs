//! HTTP handler functions for the school map API.

use actix_web::{HttpResponse, web};
use school_map_database::schools;
use school_map_server_models::{ApiHealth, ApiSchool};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/schools`
///
/// Returns every school that has coordinates.
pub async fn schools(state: web::Data<AppState>) -> HttpResponse {
    let Ok(conn) = state.db.lock() else {
        log::error!("School store mutex poisoned");
        return HttpResponse::InternalServerError().json(serde_json::json!({
            "error": "School store unavailable"
        }));
    };

    match schools::list_geocoded(&conn) {
        Ok(rows) => {
            let api_schools: Vec<ApiSchool> =
                rows.into_iter().filter_map(ApiSchool::from_located).collect();
            HttpResponse::Ok().json(api_schools)
        }
        Err(e) => {
            log::error!("Failed to query schools: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to query schools"
            }))
        }
    }
}
