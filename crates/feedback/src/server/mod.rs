//! REST service for feedback intake and retrieval
//!
//! Provides HTTP endpoints around the classification and retrieval pipeline.
//! Uses axum for routing and schemars for request schema documentation.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod startup;
pub mod state;
pub mod types;
