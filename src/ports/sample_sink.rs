//! Sample Sink Port - Histogram Observation Interface

/// Destination for values drawn by the random sampler.
///
/// Implementations must tolerate concurrent calls from any thread.
pub trait SampleSink: Send + Sync + 'static {
  /// Record one observation.
  fn record(&self, value: f64);
}
