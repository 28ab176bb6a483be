//! HTTP server for the bet wallet service.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
