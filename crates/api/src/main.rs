//! RiskView API server binary entrypoint.

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use riskview_common::config::AppConfig;
use riskview_engine::metrics::RiskMetricComputer;
use riskview_engine::register::RiskRegister;

use riskview_api::routes::create_router;
use riskview_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("riskview_api=debug,riskview_engine=debug,tower_http=debug")
        }))
        .init();

    tracing::info!("Starting RiskView API server...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // A register that fails validation blocks startup
    let register = match &config.register_path {
        Some(path) => RiskRegister::from_path(path).inspect_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Risk register rejected");
        })?,
        None => RiskRegister::load(),
    };
    let total_loss = RiskMetricComputer::total_loss_expectancy(register.entries())?;
    tracing::info!(
        entries = register.len(),
        total_loss = %total_loss.display_major(),
        "Risk register ready"
    );

    let addr = config.bind_addr;

    // Build application state
    let state = AppState::new(register, config);

    // Build router
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    tracing::info!("API server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
