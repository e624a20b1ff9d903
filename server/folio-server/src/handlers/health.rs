use axum::response::Json;
use serde_json::{json, Value};

/// Liveness probe, no session or database work
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
