pub mod charts;
pub mod dashboard;
pub mod entries;
pub mod health;
pub mod summary;

use axum::Router;
use axum::http::Uri;
use serde::Deserialize;

use riskview_common::error::AppError;
use riskview_common::types::AssetSelector;

use crate::state::AppState;

/// `?asset=` query shared by the filterable routes. Absent means `All`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetQuery {
    #[serde(default)]
    pub asset: AssetSelector,
}

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(summary::router())
        .merge(entries::router())
        .merge(charts::router())
        .merge(dashboard::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}
