use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "CashWise API proxy",
            "version": version,
            "description": "Session-checked proxy in front of the CashWise backend API",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "transaction": "/api/transaction/:id (PATCH, DELETE; session required)",
                "budget": "/api/budget/:id (PATCH, DELETE; session required)",
                "category": "/api/category/:id (PATCH, DELETE; session required)",
                "goal": "/api/goal/:id (PATCH, DELETE; session required)",
            }
        }
    }))
}

/// GET /health - liveness plus whether an upstream is configured
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    if state.upstream.is_configured() {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "timestamp": now, "upstream": "configured" }
            })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "upstream API not configured",
                "data": { "status": "degraded", "timestamp": now, "upstream": "missing" }
            })),
        )
    }
}
