// ABOUTME: Health and root endpoints for the API
// ABOUTME: Unauthenticated probes used by deploy checks and monitors

use axum::Json;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Requirements Management API",
    }))
}

pub async fn health_check() -> Json<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(json!({
        "status": "healthy",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
        "service": "reqtrack",
    }))
}
