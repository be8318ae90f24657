//! Integration tests for API routes.
//!
//! Uses `tower::ServiceExt` to test Axum routes without a real HTTP server.
//!
//! ```bash
//! cargo test -p riskview-api --test integration
//! ```

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use riskview_api::routes::create_router;
use riskview_api::state::AppState;
use riskview_common::config::AppConfig;
use riskview_engine::register::RiskRegister;

// ============================================================
// Helpers
// ============================================================

fn reference_app() -> Router {
    create_router(AppState::new(RiskRegister::load(), AppConfig::default()))
}

fn empty_app() -> Router {
    let register = RiskRegister::from_json_str("[]").unwrap();
    create_router(AppState::new(register, AppConfig::default()))
}

/// Issue a GET and return the status plus the decoded JSON body.
async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

// ============================================================
// Routes
// ============================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (status, json) = get_json(reference_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "riskview-api");
    assert_eq!(json["entries"], 7);
    assert_eq!(json["register_source"], "builtin");
}

#[tokio::test]
async fn test_health_reports_register_file() {
    let config = AppConfig {
        register_path: Some("/etc/riskview/register.json".into()),
        ..AppConfig::default()
    };
    let app = create_router(AppState::new(RiskRegister::load(), config));
    let (status, json) = get_json(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["register_source"], "/etc/riskview/register.json");
}

#[tokio::test]
async fn test_summary() {
    let (status, json) = get_json(reference_app(), "/api/summary").await;

    assert_eq!(status, StatusCode::OK);
    // Money is serialized in pence
    assert_eq!(json["total_loss_expectancy"], 2_550_000_000u64);
    assert_eq!(json["total_loss_display"], "£25,500,000");
    assert_eq!(json["highest_single_loss"], 960_000_000u64);
    assert_eq!(json["highest_single_loss_title"], "Electronic Data - Human Error");
    assert_eq!(json["risk_factor_count"], 7);
}

#[tokio::test]
async fn test_summary_empty_register() {
    let (status, json) = get_json(empty_app(), "/api/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_loss_expectancy"], 0);
    assert!(json["highest_single_loss"].is_null());
    assert_eq!(json["risk_factor_count"], 0);
}

#[tokio::test]
async fn test_asset_options() {
    let (status, json) = get_json(reference_app(), "/api/assets").await;

    assert_eq!(status, StatusCode::OK);
    let options = json.as_array().unwrap();
    assert_eq!(options.len(), 6);
    assert_eq!(options[0], "All");
    assert_eq!(options[1], "Electronic Data");
}

#[tokio::test]
async fn test_entries_default_to_all() {
    let (status, json) = get_json(reference_app(), "/api/entries").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 7);
    assert_eq!(entries[0]["annual_loss_expectancy"], 960_000_000u64);
}

#[tokio::test]
async fn test_entries_filtered_by_asset() {
    let (status, json) =
        get_json(reference_app(), "/api/entries?asset=Electronic%20Data").await;

    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["vulnerability"], "Human Error");
    assert_eq!(entries[1]["vulnerability"], "SQL Injection");
}

#[tokio::test]
async fn test_entries_unknown_asset_is_empty_not_error() {
    let (status, json) = get_json(reference_app(), "/api/entries?asset=Nonexistent").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_sorted_entries() {
    let (status, json) = get_json(reference_app(), "/api/entries/sorted").await;

    assert_eq!(status, StatusCode::OK);
    let losses: Vec<u64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["annual_loss_expectancy"].as_u64().unwrap())
        .collect();
    assert_eq!(losses.len(), 7);
    assert!(losses.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(json[2]["vulnerability"], "Power Interruptions");
    assert_eq!(json[3]["vulnerability"], "Social Engineering");
}

#[tokio::test]
async fn test_max_entry() {
    let (status, json) = get_json(reference_app(), "/api/entries/max").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["vulnerability"], "Human Error");
}

#[tokio::test]
async fn test_max_entry_empty_register() {
    let (status, json) = get_json(empty_app(), "/api/entries/max").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().starts_with("Empty input"));
}

#[tokio::test]
async fn test_chart_routes() {
    let (status, bars) = get_json(reference_app(), "/api/charts/loss-by-asset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bars.as_array().unwrap().len(), 7);
    assert_eq!(bars[0]["vulnerability"], "Human Error");
    assert_eq!(bars[0]["points"][0]["asset"], "Electronic Data");

    let (status, matrix) = get_json(reference_app(), "/api/charts/risk-matrix").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matrix[4]["label"], "Power Interruptions");
    assert_eq!(matrix[4]["exposure_factor"], 0.9);
    assert_eq!(matrix[4]["asset_value"], 2);
    assert_eq!(matrix[4]["annual_rate"], 52.0);
}

#[tokio::test]
async fn test_table_and_details() {
    let (status, table) = get_json(reference_app(), "/api/table").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table[0]["annual_loss_display"], "£9,600,000");
    assert_eq!(table[6]["vulnerability"], "Denial of Services");

    let (status, details) = get_json(reference_app(), "/api/details?asset=Staff").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details.as_array().unwrap().len(), 1);
    assert_eq!(details[0]["title"], "Staff - Social Engineering");
    assert_eq!(details[0]["exposure_factor_display"], "90.0%");
    assert_eq!(details[0]["annual_rate_display"], "52 (Weekly)");
}

#[tokio::test]
async fn test_dashboard_bundle() {
    let (status, json) = get_json(reference_app(), "/api/dashboard?asset=Reputation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["selected_asset"], "Reputation");
    assert!(json["generated_at"].is_string());
    assert_eq!(json["summary"]["risk_factor_count"], 7);
    assert_eq!(json["table"].as_array().unwrap().len(), 7);
    assert_eq!(json["details"].as_array().unwrap().len(), 1);
    assert_eq!(json["details"][0]["annual_loss_display"], "£600,000");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, json) = get_json(reference_app(), "/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "No route for /api/nope");
}
