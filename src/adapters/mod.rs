//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `http`: axum server for `/` and `/metrics`, reqwest poll client
//! - `metrics`: Prometheus registry and text exposition

pub mod http;
pub mod metrics;
