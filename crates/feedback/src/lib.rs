//! Feedback - Classification and Semantic Retrieval Service
//!
//! Ingests free-text user feedback, classifies it through an external
//! language-model provider, embeds it, and serves paged queries that rank
//! stored feedback by semantic similarity or filter it by sentiment and tag.

pub mod config;
pub mod error;
pub mod server;
