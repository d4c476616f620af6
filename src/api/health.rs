use axum::{extract::State, response::IntoResponse, Json};

use crate::AppState;

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.coordinator.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "initialized": snapshot.initialized,
        "connected": snapshot.connector.is_some(),
    }))
}
