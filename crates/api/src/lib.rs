//! RiskView dashboard API.
//!
//! Serves the risk register's summary metrics, chart series, detail table and
//! filtered detail cards as JSON for the dashboard front end.

pub mod routes;
pub mod state;
