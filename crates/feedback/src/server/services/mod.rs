//! Services behind the REST handlers
//!
//! The classification path runs fingerprint -> cache -> classification,
//! the retrieval path runs query -> embeddings -> similarity.

pub mod cache;
pub mod classification;
pub mod embeddings;
pub mod fingerprint;
pub mod intake;
pub mod query;
pub mod similarity;
pub mod store;
