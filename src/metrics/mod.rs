//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_counter_with_registry,
    register_histogram_vec_with_registry, register_histogram_with_registry, Counter, CounterVec,
    Histogram, HistogramVec, Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // Chat client metrics
    pub chat_requests: CounterVec,
    pub chat_request_duration: HistogramVec,

    // Token budget metrics
    pub transcript_tokens: Histogram,
    pub trim_evictions: Counter,
    pub trim_passes: Counter,
    pub budget_unsatisfiable: Counter,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let chat_requests = register_counter_vec_with_registry!(
            Opts::new("chat_requests_total", "Total chat completion requests"),
            &["status"],
            registry
        )?;

        let chat_request_duration = register_histogram_vec_with_registry!(
            "chat_request_duration_seconds",
            "Chat completion request duration in seconds",
            &["endpoint"],
            registry
        )?;

        let transcript_tokens = register_histogram_with_registry!(
            "transcript_tokens",
            "Transcript token count after budget enforcement",
            registry
        )?;

        let trim_evictions = register_counter_with_registry!(
            Opts::new("trim_evictions_total", "Total messages evicted by trimming"),
            registry
        )?;

        let trim_passes = register_counter_with_registry!(
            Opts::new("trim_passes_total", "Total trim passes executed"),
            registry
        )?;

        let budget_unsatisfiable = register_counter_with_registry!(
            Opts::new(
                "budget_unsatisfiable_total",
                "Trim passes that ended with only system messages over budget"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            chat_requests,
            chat_request_duration,
            transcript_tokens,
            trim_evictions,
            trim_passes,
            budget_unsatisfiable,
        })
    }

    /// Get the metrics registry for exporting
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Record a chat completion request
    pub fn record_chat_request(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.chat_requests.with_label_values(&[status]).inc();
    }

    /// Record the outcome of a trim pass
    pub fn record_trim(&self, evicted: usize, tokens: usize) {
        self.trim_passes.inc();
        self.trim_evictions.inc_by(evicted as f64);
        self.transcript_tokens.observe(tokens as f64);
    }

    /// Record a pass that could not satisfy the budget
    pub fn record_unsatisfiable(&self) {
        self.budget_unsatisfiable.inc();
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).unwrap_or_default();

        String::from_utf8(buffer).unwrap_or_default()
    }
}
