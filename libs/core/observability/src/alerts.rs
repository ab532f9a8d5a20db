//! Metrics for authentication alert delivery.

use metrics::{counter, histogram};

pub const ATTEMPTS_TOTAL: &str = "auth_alert_attempts_total";
pub const DISPATCH_TOTAL: &str = "auth_alert_dispatch_total";
pub const DISPATCH_DURATION: &str = "auth_alert_dispatch_duration_seconds";

/// Final result of one dispatch call, used as a metric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchResultLabel {
    Delivered,
    Failed,
    Skipped,
}

impl DispatchResultLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchResultLabel::Delivered => "delivered",
            DispatchResultLabel::Failed => "failed",
            DispatchResultLabel::Skipped => "skipped",
        }
    }
}

/// Alert metrics recorder
pub struct AlertMetrics;

impl AlertMetrics {
    /// Record a single delivery attempt.
    pub fn record_attempt(success: bool) {
        let outcome = if success { "success" } else { "failure" };
        counter!(ATTEMPTS_TOTAL, "outcome" => outcome).increment(1);
    }

    /// Record the end of a dispatch call.
    pub fn record_dispatch(result: DispatchResultLabel, duration_ms: u64) {
        counter!(DISPATCH_TOTAL, "result" => result.as_str()).increment(1);
        histogram!(DISPATCH_DURATION, "result" => result.as_str())
            .record(duration_ms as f64 / 1000.0);

        tracing::debug!(
            result = result.as_str(),
            duration_ms = duration_ms,
            "Recorded auth alert dispatch"
        );
    }
}
