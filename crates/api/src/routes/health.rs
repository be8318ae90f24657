//! Health check endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let register_source = state
        .config
        .register_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string());

    Json(json!({
        "status": "ok",
        "service": "riskview-api",
        "version": env!("CARGO_PKG_VERSION"),
        "entries": state.register.len(),
        "register_source": register_source
    }))
}
