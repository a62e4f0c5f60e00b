//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};

use super::AppConfig;

/// Longest pause the self-poller may be configured with.
const MAX_SLEEP_CEILING_SECS: u64 = 3_600;

/// Load and validate configuration from a TOML file.
///
/// Runs before the subscriber exists, so it logs nothing; the caller
/// reports the loaded values once tracing is up.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Load `path` if it exists, otherwise fall back to built-in defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<AppConfig> {
  let path = path.as_ref();
  if path.exists() {
    load_config(path)
  } else {
    Ok(AppConfig::default())
  }
}

/// Parse and validate TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig = toml::from_str(content).context("Failed to parse TOML")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
fn validate_config(config: &AppConfig) -> Result<()> {
  anyhow::ensure!(
    !config.app.name.is_empty(),
    "app.name must not be empty"
  );

  config
    .server
    .bind_address
    .parse::<SocketAddr>()
    .with_context(|| {
      format!(
        "server.bind_address must be a socket address, got {:?}",
        config.server.bind_address
      )
    })?;

  let url = &config.poller.target_url;
  anyhow::ensure!(
    url.starts_with("http://") || url.starts_with("https://"),
    "poller.target_url must be an http(s) URL, got {url:?}"
  );
  anyhow::ensure!(
    config.poller.max_sleep_seconds <= MAX_SLEEP_CEILING_SECS,
    "poller.max_sleep_seconds must be at most {MAX_SLEEP_CEILING_SECS}, got {}",
    config.poller.max_sleep_seconds
  );

  Ok(())
}
