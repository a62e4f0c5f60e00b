//! Hello Metrics — Library Root
//!
//! Re-exports all modules for the binary, integration tests and
//! benchmarks.

pub mod adapters;
pub mod config;
pub mod ports;
pub mod usecases;

#[cfg(test)]
mod test_logs;
