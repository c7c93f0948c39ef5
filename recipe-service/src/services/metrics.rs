//! Metrics collection for recipe-service.
//!
//! Counters and histograms go through the `metrics` facade and are rendered
//! by the Prometheus recorder installed at startup.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder.
pub fn init_metrics() -> anyhow::Result<()> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    if METRICS_HANDLE.set(handle).is_err() {
        tracing::warn!("Metrics recorder was initialized concurrently");
    }

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record a chat-completion call.
pub fn record_provider_call(provider: &'static str, status: &'static str) {
    counter!(
        "recipe_provider_calls_total",
        "provider" => provider,
        "status" => status
    )
    .increment(1);
}
