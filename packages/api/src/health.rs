// ABOUTME: Liveness endpoint
// ABOUTME: Reports service name, version, and current time

use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use toolkit_core::SERVICE_NAME;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().timestamp(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}
