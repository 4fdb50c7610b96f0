pub mod drinks;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppContext;

/// GET / - service index
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Barista API",
            "version": version,
            "description": "Drinks menu API with scoped bearer-token authorization",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "drinks": "GET /drinks (public), POST /drinks (post:drinks)",
                "drinks_detail": "GET /drinks-detail (get:drinks-detail)",
                "drink": "PATCH /drinks/:id (patch:drinks), DELETE /drinks/:id (delete:drinks)",
            }
        }
    }))
}

/// GET /health - liveness plus a store connectivity probe
pub async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match ctx.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "status": "ok",
                "timestamp": now,
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "status": "degraded",
                "timestamp": now,
                "database_error": e.to_string(),
            })),
        ),
    }
}

/// Router fallback for unknown paths.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Method-router fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
