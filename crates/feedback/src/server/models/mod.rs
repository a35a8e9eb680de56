//! Domain models for feedback, classifications, tags and queries

pub mod feedback;
pub mod filter;
pub mod tag;

pub use feedback::{Classification, ClassificationResult, FeedbackRecord, Priority, Sentiment};
pub use filter::{Page, QueryFilter, SearchMode};
pub use tag::Tag;
