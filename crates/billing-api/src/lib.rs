//! # billing-api
//!
//! HTTP API layer for subscribe-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - The subscription checkout endpoint
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/subscribe` | Initiate a subscription checkout |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
