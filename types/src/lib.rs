//! Core domain types for Primer.
//!
//! This crate contains the topic document model with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod document;
pub mod ui;

pub use document::{
    AlertBlock, AlertVariant, BlockKind, CodeBlock, ContentBlock, Difficulty, HeadingBlock,
    ListBlock, ListStyle, ParagraphBlock, TableBlock, Topic, TopicMeta,
};
pub use ui::{ColorScheme, UiOptions};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Topic identifiers
// ============================================================================

/// Unique key of a topic in the registry.
///
/// Guaranteed non-empty after trimming. Comparison is exact (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicId(String);

#[derive(Debug, Error)]
#[error("topic id must not be empty")]
pub struct TopicIdError;

impl TopicId {
    pub fn new(value: impl Into<String>) -> Result<Self, TopicIdError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(TopicIdError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TopicId {
    type Error = TopicIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TopicId {
    type Error = TopicIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicId> for String {
    fn from(value: TopicId) -> Self {
        value.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_id_rejects_blank() {
        assert!(TopicId::new("").is_err());
        assert!(TopicId::new("   ").is_err());
    }

    #[test]
    fn topic_id_round_trips_through_json() {
        let id = TopicId::new("rust-ownership").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"rust-ownership\"");
        let back: TopicId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn topic_id_deserialize_rejects_empty() {
        let result: Result<TopicId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
