//! HTTP shell around the [`ipn`] crate.
//!
//! Receives gateway callbacks on `POST /ipn`, hands out deposit addresses on
//! `GET /give`, and exposes liveness, health and Prometheus metrics.
//!
//! # Modules
//!
//! - [`config`]: environment configuration ([`ServerConfig`](config::ServerConfig))
//! - [`state`]: shared [`AppState`](state::AppState)
//! - [`routes`]: HTTP endpoints
//! - [`error`]: handler errors mapped to JSON responses
//! - [`metrics`]: Prometheus counters and the metered address source
//! - [`cors`]: CORS middleware

pub mod config;
pub mod cors;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
