//! Persistent class content

pub mod content;

// Re-exports for convenience
pub use content::{AnswerKey, ContentDocument, ContentStore, NOT_SET_YET};
