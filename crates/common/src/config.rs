use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;

/// Default listen address for the dashboard API.
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address the API server binds to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Optional JSON file to load the risk register from.
    /// When unset, the built-in reference register is used.
    pub register_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            register_path: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("RISKVIEW_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("RISKVIEW_BIND_ADDR must be a valid socket address".to_string())
            })?;

        Ok(Self {
            bind_addr,
            register_path: get("RISKVIEW_REGISTER_PATH").map(PathBuf::from),
        })
    }
}
