//! Observability utilities for the auth alert dispatcher.
//!
//! This crate provides:
//! - Prometheus metrics recorder installation and rendering
//! - `AlertMetrics` for delivery attempts and dispatch results
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, render_metrics, AlertMetrics};
//!
//! init_metrics();
//! AlertMetrics::record_attempt(true);
//! println!("{}", render_metrics());
//! ```

pub mod alerts;

pub use alerts::{AlertMetrics, DispatchResultLabel};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at startup. Returns `None` when another global recorder was
/// installed first; metrics then go to that recorder instead.
pub fn init_metrics() -> Option<&'static PrometheusHandle> {
    let handle = METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;
        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();
        Ok::<_, metrics_exporter_prometheus::BuildError>(handle)
    });

    match handle {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, "Failed to install Prometheus recorder");
            None
        }
    }
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        alerts::ATTEMPTS_TOTAL,
        "Delivery attempts for auth alerts by outcome"
    );
    describe_counter!(
        alerts::DISPATCH_TOTAL,
        "Auth alert dispatch calls by final result"
    );
    describe_histogram!(
        alerts::DISPATCH_DURATION,
        "Auth alert dispatch duration in seconds, including backoff"
    );
}
