//! Self Poller - Synthetic Request Traffic
//!
//! Repeatedly fetches the service's own root endpoint so the request
//! counter moves without external clients. Each cycle requests, logs the
//! body or the error, then sleeps a uniformly random whole number of
//! seconds. Failures never end the loop; only the shutdown signal does.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::broadcast;
use tracing::{error, info, instrument};

use crate::ports::poll_target::PollTarget;

/// Result of a single poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
  /// The full response body.
  Response(String),
  /// Request or body read failed; already logged.
  Failed,
}

/// Poll counters since the loop started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
  /// Polls that returned a body.
  pub successes: u64,
  /// Polls that failed.
  pub failures: u64,
}

/// Self-traffic generator.
pub struct SelfPoller {
  /// Endpoint being polled.
  target: Arc<dyn PollTarget>,
  /// Upper bound (inclusive) of the random pause, in seconds.
  max_sleep_secs: u64,
  /// Successful polls.
  successes: AtomicU64,
  /// Failed polls.
  failures: AtomicU64,
}

impl SelfPoller {
  /// Create a poller pausing up to `max_sleep_secs` between requests.
  pub fn new(target: Arc<dyn PollTarget>, max_sleep_secs: u64) -> Self {
    Self {
      target,
      max_sleep_secs,
      successes: AtomicU64::new(0),
      failures: AtomicU64::new(0),
    }
  }

  /// Issue one request and log what came back.
  pub async fn poll_once(&self) -> PollOutcome {
    match self.target.fetch().await {
      Ok(body) => {
        self.successes.fetch_add(1, Ordering::Relaxed);
        info!("Response: {body}");
        PollOutcome::Response(body)
      }
      Err(e) => {
        self.failures.fetch_add(1, Ordering::Relaxed);
        let chain = format!("{e:#}");
        error!(
          error = %chain,
          url = %self.target.url(),
          "Self-poll failed"
        );
        PollOutcome::Failed
      }
    }
  }

  /// Random pause in `[0, max_sleep_secs]` whole seconds.
  pub fn next_pause(&self) -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(0..=self.max_sleep_secs))
  }

  /// Current poll counters.
  pub fn stats(&self) -> PollStats {
    PollStats {
      successes: self.successes.load(Ordering::Relaxed),
      failures: self.failures.load(Ordering::Relaxed),
    }
  }

  /// Poll forever until a shutdown message arrives or the sender drops.
  ///
  /// The signal interrupts both an in-flight request and the pause.
  #[instrument(skip(self, shutdown_rx), fields(url = %self.target.url()))]
  pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) {
    info!(max_sleep_secs = self.max_sleep_secs, "Self-poller started");

    loop {
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => break,
        _ = self.poll_once() => {}
      }

      let pause = self.next_pause();
      tokio::select! {
        biased;
        _ = shutdown_rx.recv() => break,
        () = tokio::time::sleep(pause) => {}
      }
    }

    let stats = self.stats();
    info!(
      successes = stats.successes,
      failures = stats.failures,
      "Self-poller stopped"
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use anyhow::anyhow;
  use async_trait::async_trait;

  struct FixedTarget {
    body: Option<&'static str>,
  }

  #[async_trait]
  impl PollTarget for FixedTarget {
    async fn fetch(&self) -> anyhow::Result<String> {
      self
        .body
        .map(str::to_string)
        .ok_or_else(|| anyhow!("connection refused").context("HTTP request failed"))
    }

    fn url(&self) -> &str {
      "http://fixed/"
    }
  }

  #[test]
  fn test_poll_once_success() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: Some("ok") }), 9);
    let outcome = tokio_test::block_on(poller.poll_once());

    assert_eq!(outcome, PollOutcome::Response("ok".to_string()));
    assert_eq!(poller.stats(), PollStats { successes: 1, failures: 0 });
  }

  #[test]
  fn test_poll_once_failure_is_swallowed() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: None }), 9);
    let outcome = tokio_test::block_on(poller.poll_once());

    assert_eq!(outcome, PollOutcome::Failed);
    assert_eq!(poller.stats(), PollStats { successes: 0, failures: 1 });
  }

  #[test]
  fn test_poll_once_logs_response_body() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: Some("ok") }), 9);
    let (_, logs) = crate::test_logs::capture(|| tokio_test::block_on(poller.poll_once()));

    assert!(logs.contains("INFO"), "{logs}");
    assert!(logs.contains("Response: ok"), "{logs}");
  }

  #[test]
  fn test_poll_once_logs_error_chain() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: None }), 9);
    let (_, logs) = crate::test_logs::capture(|| tokio_test::block_on(poller.poll_once()));

    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("Self-poll failed"), "{logs}");
    assert!(logs.contains("HTTP request failed: connection refused"), "{logs}");
    assert!(logs.contains("http://fixed/"), "{logs}");
    assert!(!logs.contains("Response:"), "{logs}");
  }

  #[test]
  fn test_next_pause_within_bounds() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: None }), 9);
    for _ in 0..1_000 {
      let pause = poller.next_pause();
      assert!(pause <= Duration::from_secs(9));
      assert_eq!(pause.subsec_nanos(), 0);
    }
  }

  #[test]
  fn test_zero_max_sleep_never_pauses() {
    let poller = SelfPoller::new(Arc::new(FixedTarget { body: None }), 0);
    assert_eq!(poller.next_pause(), Duration::ZERO);
  }

  #[tokio::test]
  async fn test_run_keeps_polling_after_failures() {
    let poller = Arc::new(SelfPoller::new(Arc::new(FixedTarget { body: None }), 0));
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let runner = Arc::clone(&poller);
    let handle = tokio::spawn(async move { runner.run(shutdown_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown_tx.send(()).unwrap();
    handle.await.unwrap();

    assert!(poller.stats().failures >= 2, "loop must survive failures");
  }
}
