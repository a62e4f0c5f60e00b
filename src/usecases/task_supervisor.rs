//! Background Task Supervisor - Sampler and Poller Lifecycle
//!
//! Spawns the random sampler and the self-poller as independent tokio
//! tasks sharing one shutdown broadcast. Neither task is restarted; the
//! poller swallows its own failures and the sampler cannot fail.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::adapters::metrics::MetricsRegistry;
use crate::ports::poll_target::PollTarget;
use crate::ports::sample_sink::SampleSink;
use crate::usecases::random_sampler::RandomSampler;
use crate::usecases::self_poller::SelfPoller;

/// Handles of the running background tasks.
pub struct BackgroundTasks {
  /// Sampler thread; yields the sample count on exit.
  pub sampler: JoinHandle<u64>,
  /// Poller task.
  pub poller: JoinHandle<()>,
}

/// Owns the shared shutdown channel for the background loops.
pub struct TaskSupervisor {
  /// Registry the sampler writes into.
  metrics: Arc<MetricsRegistry>,
  /// Poller driven by the supervisor.
  poller: Arc<SelfPoller>,
  /// Shutdown broadcaster.
  shutdown_tx: broadcast::Sender<()>,
}

impl TaskSupervisor {
  /// Create a supervisor for the given registry and poll target.
  pub fn new(
    metrics: Arc<MetricsRegistry>,
    target: Arc<dyn PollTarget>,
    max_sleep_secs: u64,
  ) -> Self {
    let (shutdown_tx, _) = broadcast::channel(1);
    Self {
      metrics,
      poller: Arc::new(SelfPoller::new(target, max_sleep_secs)),
      shutdown_tx,
    }
  }

  /// Shared poller, for reading its stats.
  pub fn poller(&self) -> Arc<SelfPoller> {
    Arc::clone(&self.poller)
  }

  /// Spawn both loops.
  #[instrument(skip(self))]
  pub fn spawn(&self) -> BackgroundTasks {
    let sink: Arc<dyn SampleSink> = self.metrics.clone();
    let sampler = RandomSampler::new(sink).spawn(self.shutdown_tx.subscribe());

    let poller = {
      let poller = Arc::clone(&self.poller);
      let shutdown_rx = self.shutdown_tx.subscribe();
      tokio::spawn(async move { poller.run(shutdown_rx).await })
    };

    info!(task_count = 2, "Background tasks spawned");
    BackgroundTasks { sampler, poller }
  }

  /// Signal every spawned loop to stop.
  pub fn shutdown(&self) {
    if self.shutdown_tx.send(()).is_err() {
      warn!("No background task listening for shutdown");
    }
  }
}

impl BackgroundTasks {
  /// Wait for both loops to exit. Returns the sampler's sample count.
  pub async fn join(self) -> u64 {
    if let Err(e) = self.poller.await {
      warn!(error = %e, "Self-poller task ended abnormally");
    }
    match self.sampler.await {
      Ok(samples) => samples,
      Err(e) => {
        warn!(error = %e, "Random sampler task ended abnormally");
        0
      }
    }
  }
}
