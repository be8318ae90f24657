//! Headline metric routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use riskview_common::error::AppError;
use riskview_engine::views::{self, SummaryMetrics};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/summary", get(summary))
        .route("/api/assets", get(asset_options))
}

/// GET /api/summary — Total loss expectancy, highest single loss and entry count.
async fn summary(State(state): State<AppState>) -> Result<Json<SummaryMetrics>, AppError> {
    let summary = SummaryMetrics::from_entries(state.register.entries())?;
    Ok(Json(summary))
}

/// GET /api/assets — Options for the asset selector, starting with "All".
async fn asset_options(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(views::asset_options(state.register.entries()))
}
