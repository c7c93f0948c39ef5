//! HTTP handlers for the recipe service.

pub mod health;
pub mod metrics;
pub mod recipe;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_endpoint;
pub use recipe::get_recipe;
