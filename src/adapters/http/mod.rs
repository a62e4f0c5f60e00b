//! HTTP Adapters
//!
//! - `server`: axum server for `/` and `/metrics`
//! - `client`: reqwest client the self-poller uses to reach `/`

pub mod client;
pub mod server;

pub use client::HttpTarget;
pub use server::HttpServer;
