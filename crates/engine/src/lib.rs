pub mod metrics;
pub mod register;
pub mod views;
