//! Risk entry routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use riskview_common::error::AppError;
use riskview_common::types::RiskEntry;
use riskview_engine::metrics::RiskMetricComputer;

use crate::routes::AssetQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/entries", get(list_entries))
        .route("/api/entries/sorted", get(sorted_entries))
        .route("/api/entries/max", get(max_entry))
}

/// GET /api/entries?asset= — Entries for one asset, or all of them, in register order.
async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> Json<Vec<RiskEntry>> {
    let entries = RiskMetricComputer::filter_by_asset(state.register.entries(), &query.asset);
    tracing::debug!(asset = %query.asset, matched = entries.len(), "Filtered risk entries");
    Json(entries.into_iter().cloned().collect())
}

/// GET /api/entries/sorted — Entries by annual loss expectancy, highest first.
async fn sorted_entries(State(state): State<AppState>) -> Json<Vec<RiskEntry>> {
    let sorted = RiskMetricComputer::sort_by_loss_descending(state.register.entries());
    Json(sorted.into_iter().cloned().collect())
}

/// GET /api/entries/max — The entry with the highest annual loss expectancy.
async fn max_entry(State(state): State<AppState>) -> Result<Json<RiskEntry>, AppError> {
    let entry = RiskMetricComputer::max_loss_entry(state.register.entries())?;
    Ok(Json(entry.clone()))
}
