//! Poll Target Port - Self-Traffic Interface
//!
//! Defines the trait the self-poller uses to fetch its own root
//! endpoint. The production adapter wraps reqwest; tests substitute
//! mocks or stub servers.

use async_trait::async_trait;

/// An HTTP endpoint that can be fetched for its full body.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
  /// Fetch the target and read the complete response body.
  ///
  /// Errors carry context distinguishing a failed request from a
  /// failed body read.
  async fn fetch(&self) -> anyhow::Result<String>;

  /// URL being polled, for logging.
  fn url(&self) -> &str;
}
