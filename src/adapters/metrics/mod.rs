//! Metrics Adapters
//!
//! Prometheus registry holding the request counter and the random
//! sample histogram, rendered on `/metrics` by the HTTP server.

pub mod registry;

pub use registry::{MetricsError, MetricsRegistry};
