//! # Voice Translate Backend
//!
//! Multi-provider translation service: every request is sent to several free
//! translation providers at once, the answers are scored and the best one is
//! returned, with a serial fallback provider when all of them fail.
//!
//! ## Module Organization:
//! - **translation**: the aggregator and everything it needs (no HTTP server code)
//! - **config**: configuration (TOML file + environment variables)
//! - **state**: shared application state and metrics
//! - **health**: health and metrics endpoints
//! - **middleware**: request logging and endpoint metrics
//! - **handlers**: HTTP request handlers for API endpoints
//! - **error**: application error type and HTTP error responses

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod state;
pub mod translation;
