//! Prometheus Metrics Registry - Request and Sample Observability
//!
//! Owns the process-wide Prometheus registry and the two series this
//! service publishes: `http_requests_total` (by status code and method)
//! and `random_numbers` (a linear-bucket histogram of standard-normal
//! samples). Constructed once in `main` and shared as `Arc`.

use prometheus::core::{Collector, Metric};
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use thiserror::Error;
use tracing::debug;

use crate::ports::sample_sink::SampleSink;

/// Name of the request counter series.
pub const REQUESTS_TOTAL: &str = "http_requests_total";
/// Name of the random sample histogram series.
pub const RANDOM_NUMBERS: &str = "random_numbers";

/// Lower bound of the first histogram bucket.
pub const BUCKET_START: f64 = -3.0;
/// Width of every histogram bucket.
pub const BUCKET_WIDTH: f64 = 0.1;
/// Number of finite histogram buckets (-3.0 through 3.0).
pub const BUCKET_COUNT: usize = 61;

/// Errors surfaced by the metrics registry.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Metric construction, duplicate registration or encoding failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    /// The text encoder produced bytes that are not valid UTF-8.
    #[error("metrics exposition is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Centralized Prometheus metrics for the service.
///
/// All updates go through prometheus atomics, so the registry is shared
/// freely across the server, the sampler and the poller.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// HTTP requests by `code` and `method`.
    requests_total: IntCounterVec,
    /// Normally distributed random samples.
    random_numbers: Histogram,
}

impl MetricsRegistry {
    /// Create the registry and register both built-in series.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                REQUESTS_TOTAL,
                "Total number of HTTP requests by status code and method.",
            ),
            &["code", "method"],
        )?;

        let random_numbers = Histogram::with_opts(
            HistogramOpts::new(
                RANDOM_NUMBERS,
                "A histogram of normally distributed random numbers.",
            )
            .buckets(prometheus::linear_buckets(
                BUCKET_START,
                BUCKET_WIDTH,
                BUCKET_COUNT,
            )?),
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(random_numbers.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            random_numbers,
        })
    }

    /// Register an additional collector.
    ///
    /// # Errors
    /// Fails when a collector with the same name and label shape is
    /// already registered.
    pub fn register(&self, collector: Box<dyn Collector>) -> Result<(), MetricsError> {
        self.registry.register(collector)?;
        Ok(())
    }

    /// Record one histogram sample.
    pub fn observe(&self, value: f64) {
        self.random_numbers.observe(value);
    }

    /// Count one HTTP request. The series is created on first use.
    pub fn increment(&self, code: u16, method: &str) {
        self.requests_total
            .with_label_values(&[&code.to_string(), method])
            .inc();
    }

    /// Current value of the request counter for a label pair.
    ///
    /// Returns 0 for a pair that has never been observed, without
    /// creating the series.
    pub fn request_count(&self, code: u16, method: &str) -> u64 {
        let code = code.to_string();
        self.requests_total
            .collect()
            .iter()
            .flat_map(|family| family.get_metric())
            .find(|metric| {
                metric.get_label().iter().all(|pair| match pair.get_name() {
                    "code" => pair.get_value() == code,
                    "method" => pair.get_value() == method,
                    _ => false,
                })
            })
            .map_or(0, |metric| metric.get_counter().get_value() as u64)
    }

    /// Total number of histogram observations.
    pub fn sample_count(&self) -> u64 {
        self.random_numbers.get_sample_count()
    }

    /// Sum of all histogram observations.
    pub fn sample_sum(&self) -> f64 {
        self.random_numbers.get_sample_sum()
    }

    /// Histogram buckets as (upper bound, cumulative count), ascending.
    pub fn bucket_counts(&self) -> Vec<(f64, u64)> {
        self.random_numbers
            .metric()
            .get_histogram()
            .get_bucket()
            .iter()
            .map(|bucket| (bucket.get_upper_bound(), bucket.get_cumulative_count()))
            .collect()
    }

    /// Encode every registered collector in the Prometheus text format.
    ///
    /// Families with no series are skipped, so `http_requests_total` is
    /// absent until the first request has been counted. On a fresh process
    /// that window lasts until the first self-poll.
    pub fn render(&self) -> Result<String, MetricsError> {
        let metric_families = self.registry.gather();
        debug!(
            metric_family_count = metric_families.len(),
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl SampleSink for MetricsRegistry {
    fn record(&self, value: f64) {
        self.observe(value);
    }
}
