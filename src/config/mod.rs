//! Configuration Module - TOML-based Service Configuration
//!
//! Every setting has a built-in default matching the stock behavior
//! (port 1234, poll own root, sleep up to 9s), so a config file is
//! optional. When `config.toml` exists it overrides individual fields.

pub mod loader;

use serde::Deserialize;

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
  /// Service identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// HTTP listener.
  #[serde(default)]
  pub server: ServerConfig,
  /// Self-poll loop.
  #[serde(default)]
  pub poller: PollerConfig,
}

/// Service identity configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppSection {
  /// Human-readable service name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
  /// Socket address the server binds.
  #[serde(default = "default_bind_address")]
  pub bind_address: String,
}

/// Self-poll loop configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PollerConfig {
  /// URL fetched on every cycle.
  #[serde(default = "default_target_url")]
  pub target_url: String,
  /// Inclusive upper bound of the random pause between polls.
  #[serde(default = "default_max_sleep")]
  pub max_sleep_seconds: u64,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_address: default_bind_address(),
    }
  }
}

impl Default for PollerConfig {
  fn default() -> Self {
    Self {
      target_url: default_target_url(),
      max_sleep_seconds: default_max_sleep(),
    }
  }
}

// Default value functions for serde

fn default_name() -> String {
  "hello-metrics".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_bind_address() -> String {
  "0.0.0.0:1234".to_string()
}

fn default_target_url() -> String {
  "http://localhost:1234/".to_string()
}

fn default_max_sleep() -> u64 {
  9
}
