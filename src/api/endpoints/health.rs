//! Liveness and service-info endpoints.

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::{APP_NAME, APP_VERSION};

/// `GET /health` — confirm the process is up and the store answers.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<Value>, ApiError> {
    let conn = ctx.open_db()?;
    conn.query_row("SELECT 1", [], |_| Ok(()))
        .map_err(|e| ApiError::Internal(format!("database probe failed: {e}")))?;

    Ok(Json(json!({
        "status": "healthy",
        "database": "connected",
    })))
}

/// `GET /` — service identification.
pub async fn root() -> Json<Value> {
    Json(json!({
        "service": APP_NAME,
        "version": APP_VERSION,
        "docs": "/health",
    }))
}
