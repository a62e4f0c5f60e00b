//! Random Sampler - Synthetic Histogram Load
//!
//! Draws standard-normal values back to back and records each one in a
//! `SampleSink`. There is no delay between samples, so the loop runs on
//! a blocking worker thread and polls the shutdown channel once per
//! iteration.

use std::sync::Arc;

use rand::Rng;
use rand_distr::StandardNormal;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tokio::task::JoinHandle;
use tracing::info;

use crate::ports::sample_sink::SampleSink;

/// Busy loop feeding normally distributed samples into a sink.
pub struct RandomSampler {
  /// Where samples are recorded.
  sink: Arc<dyn SampleSink>,
}

impl RandomSampler {
  /// Create a sampler writing into `sink`.
  pub fn new(sink: Arc<dyn SampleSink>) -> Self {
    Self { sink }
  }

  /// Draw one sample, record it and return it.
  pub fn sample_once<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    let value: f64 = rng.sample(StandardNormal);
    self.sink.record(value);
    value
  }

  /// Sample until a shutdown message arrives or the sender is dropped.
  ///
  /// Blocks the calling thread. Returns the number of samples taken.
  pub fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> u64 {
    let mut rng = rand::thread_rng();
    let mut samples: u64 = 0;

    info!("Random sampler started");

    loop {
      match shutdown_rx.try_recv() {
        Err(TryRecvError::Empty) => {}
        Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => break,
      }
      self.sample_once(&mut rng);
      samples += 1;
    }

    info!(samples, "Random sampler stopped");
    samples
  }

  /// Run the loop on tokio's blocking pool.
  pub fn spawn(self, shutdown_rx: broadcast::Receiver<()>) -> JoinHandle<u64> {
    tokio::task::spawn_blocking(move || self.run(shutdown_rx))
  }
}
