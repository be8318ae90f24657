//! Chart series routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use riskview_engine::views::{self, BarSeries, MatrixPoint};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/charts/loss-by-asset", get(loss_by_asset))
        .route("/api/charts/risk-matrix", get(risk_matrix))
}

/// GET /api/charts/loss-by-asset — Bar chart series, one per vulnerability.
async fn loss_by_asset(State(state): State<AppState>) -> Json<Vec<BarSeries>> {
    Json(views::loss_by_asset(state.register.entries()))
}

/// GET /api/charts/risk-matrix — Bubble plot of exposure factor against asset value.
async fn risk_matrix(State(state): State<AppState>) -> Json<Vec<MatrixPoint>> {
    Json(views::risk_matrix(state.register.entries()))
}
