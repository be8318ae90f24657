//! Shared application state for the Axum API server.

use std::sync::Arc;

use riskview_common::config::AppConfig;
use riskview_engine::register::RiskRegister;

/// Application state shared across all route handlers via Axum `State`.
///
/// The register is immutable, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub register: Arc<RiskRegister>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(register: RiskRegister, config: AppConfig) -> Self {
        Self {
            register: Arc::new(register),
            config,
        }
    }
}
