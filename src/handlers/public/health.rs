use axum::response::Json;
use serde_json::{json, Value};

/// GET /api/v1/health_check - liveness probe, always 200
pub async fn health_check() -> Json<Value> {
    Json(json!({ "message": "Success Health Check!" }))
}
