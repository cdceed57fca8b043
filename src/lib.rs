//! jaat-gateway - content API for a personal site
//!
//! Serves blog posts, quotes and short logs as JSON over HTTP, backed by
//! MongoDB. Reads are public; writes to posts and quotes require the shared
//! admin secret.
//!
//! ## Layers
//!
//! - **Routes**: request parsing, credential check, validation, dispatch
//! - **Store**: `ContentStore` trait with MongoDB and in-memory backends
//! - **Client**: typed HTTP client with a query cache

pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod logging;
pub mod routes;
pub mod server;
pub mod store;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{GatewayError, Result};
