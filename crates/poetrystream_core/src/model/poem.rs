//! Poem document model.
//!
//! # Responsibility
//! - Define the owned, nested value types for a poem document.
//! - Define the serialized node layout shared with the editing surface.
//!
//! # Invariants
//! - Every level exclusively owns its children as an ordered `Vec`.
//! - Stanza, line and run order is reading order and is never rearranged.
//! - Style flags are concrete booleans; absence in serialized form is `false`.
//! - Empty containers are valid documents.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a poem document.
pub type PoemId = Uuid;

/// Horizontal alignment of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// CSS `text-align` keyword for this alignment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Justify => "justify",
        }
    }
}

/// Contiguous span of literal text with independent style flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl TextRun {
    /// Creates an unstyled run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// One line of a stanza.
///
/// Serialized as `{ "alignment"?: ..., "children": [runs] }` to match the
/// editor node layout; unknown editor fields such as `type` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(rename = "children")]
    pub runs: Vec<TextRun>,
}

impl Line {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            alignment: None,
            runs,
        }
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Alignment applied at render time (`left` when unset).
    pub fn effective_alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    /// Concatenated run text without styling.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Ordered group of lines with an opaque identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stanza {
    pub id: String,
    #[serde(alias = "children")]
    pub lines: Vec<Line>,
}

impl Stanza {
    pub fn new(id: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            id: id.into(),
            lines,
        }
    }
}

/// Top-level poem document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poem {
    pub id: PoemId,
    pub stanzas: Vec<Stanza>,
}

impl Poem {
    /// Creates a poem with a generated stable ID.
    pub fn new(stanzas: Vec<Stanza>) -> Self {
        Self::with_id(Uuid::new_v4(), stanzas)
    }

    /// Creates a poem with a caller-provided stable ID.
    pub fn with_id(id: PoemId, stanzas: Vec<Stanza>) -> Self {
        Self { id, stanzas }
    }

    /// Decodes a poem from its JSON document form.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Encodes this poem into its JSON document form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn line_count(&self) -> usize {
        self.stanzas.iter().map(|stanza| stanza.lines.len()).sum()
    }
}
