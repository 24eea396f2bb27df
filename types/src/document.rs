//! Topic documents and their typed content blocks.
//!
//! A topic's `content` is an ordered sequence of [`ContentBlock`]s. The block
//! set is closed: anything tagged with an unknown `type` deserializes to
//! [`ContentBlock::Unsupported`] instead of failing the whole document. So does
//! a known block too malformed to read, one block at a time.

use std::collections::BTreeMap;
use std::iter;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::TopicId;

// ============================================================================
// Metadata
// ============================================================================

/// How demanding a topic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }
}

/// Descriptive metadata shown in the listing and the detail header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicMeta {
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: Difficulty,
    /// Estimated reading time in minutes.
    pub duration: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Any further metadata fields, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

// ============================================================================
// Content blocks
// ============================================================================

const DEFAULT_HEADING_LEVEL: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingBlock {
    #[serde(default = "default_heading_level")]
    pub level: u8,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphBlock {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListBlock {
    pub style: ListStyle,
    #[serde(default)]
    pub items: Vec<String>,
}

/// A table. Rows are not required to match the header width, and scalar cells
/// (numbers, booleans) are read as their text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    #[serde(default, deserialize_with = "cell_row")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "cell_rows")]
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    /// Number of columns needed to show every header and every cell.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertVariant {
    Info,
    Warning,
    #[serde(alias = "error")]
    Danger,
}

impl AlertVariant {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Info => "Note",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertBlock {
    pub variant: AlertVariant,
    pub content: String,
}

/// The tag of a renderable block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
    List,
    Table,
    Alert,
}

/// One element of a topic's content, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Heading(HeadingBlock),
    Paragraph(ParagraphBlock),
    Code(CodeBlock),
    List(ListBlock),
    Table(TableBlock),
    Alert(AlertBlock),
    /// Any block whose `type` is not one of the known tags. Its fields are discarded.
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    /// The block's tag, or `None` for [`ContentBlock::Unsupported`].
    #[must_use]
    pub const fn kind(&self) -> Option<BlockKind> {
        match self {
            Self::Heading(_) => Some(BlockKind::Heading),
            Self::Paragraph(_) => Some(BlockKind::Paragraph),
            Self::Code(_) => Some(BlockKind::Code),
            Self::List(_) => Some(BlockKind::List),
            Self::Table(_) => Some(BlockKind::Table),
            Self::Alert(_) => Some(BlockKind::Alert),
            Self::Unsupported => None,
        }
    }

    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.kind().is_some()
    }
}

// ============================================================================
// Topic
// ============================================================================

/// A catalogued document. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: TopicId,
    pub meta: TopicMeta,
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl Topic {
    /// Case-insensitive substring match over title, description, category and keywords.
    ///
    /// A blank query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let meta = &self.meta;
        [&meta.title, &meta.description, &meta.category]
            .into_iter()
            .chain(meta.keywords.iter())
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

// ============================================================================
// Lenient content
// ============================================================================

const fn default_heading_level() -> u8 {
    DEFAULT_HEADING_LEVEL
}

/// Read each block on its own; one that fails becomes [`ContentBlock::Unsupported`].
fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|value| serde_json::from_value(value).unwrap_or(ContentBlock::Unsupported))
        .collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn cell_row<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let row = Vec::<Value>::deserialize(deserializer)?;
    Ok(row.into_iter().map(cell_text).collect())
}

fn cell_rows<'de, D>(deserializer: D) -> Result<Vec<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Vec<Value>>::deserialize(deserializer)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect())
}
