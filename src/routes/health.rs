use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::AppState;

/// Liveness probe. Reports which backend is active without touching
/// storage, so it stays green while the database is down.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "backend": state.config.storage_backend.as_str(),
    }))
}
