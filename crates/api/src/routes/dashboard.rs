//! Table, detail and full-dashboard routes.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use riskview_common::error::AppError;
use riskview_engine::views::{self, Dashboard, RiskDetail, TableRow};

use crate::routes::AssetQuery;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/table", get(risk_table))
        .route("/api/details", get(risk_details))
        .route("/api/dashboard", get(dashboard))
}

/// GET /api/table — Detail table sorted by annual loss expectancy.
async fn risk_table(State(state): State<AppState>) -> Json<Vec<TableRow>> {
    Json(views::risk_table(state.register.entries()))
}

/// GET /api/details?asset= — Detail cards for the selected asset.
async fn risk_details(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> Json<Vec<RiskDetail>> {
    Json(views::risk_details(state.register.entries(), &query.asset))
}

/// GET /api/dashboard?asset= — Every view in one payload, stamped with the build time.
async fn dashboard(
    State(state): State<AppState>,
    Query(query): Query<AssetQuery>,
) -> Result<Json<Dashboard>, AppError> {
    let dashboard = Dashboard::build(&state.register, &query.asset, Utc::now())?;
    Ok(Json(dashboard))
}
