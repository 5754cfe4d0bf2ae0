//! Poem to visual-tree rendering.
//!
//! # Responsibility
//! - Map a poem document to a presentational tree of identical shape.
//! - Decode serialized documents and surface structural errors.
//!
//! # Invariants
//! - One block per stanza, one block per line, one span per run; nothing is
//!   added, dropped or reordered.
//! - Alignment is a line-level attribute; spans never carry their own.
//! - Rendering is pure: the same poem always yields an equal tree.

use crate::model::poem::{Alignment, Line, Poem, PoemId, Stanza, TextRun};
use serde::Serialize;
use thiserror::Error;

/// Rendering failures.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The serialized document does not have the poem shape.
    #[error("malformed poem document: {0}")]
    MalformedDocument(#[from] serde_json::Error),
}

/// Visual style of one span. Each flag is independent of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl SpanStyle {
    pub fn font_weight(self) -> &'static str {
        if self.bold {
            "bold"
        } else {
            "normal"
        }
    }

    pub fn font_style(self) -> &'static str {
        if self.italic {
            "italic"
        } else {
            "normal"
        }
    }

    pub fn text_decoration(self) -> &'static str {
        if self.underline {
            "underline"
        } else {
            "none"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    pub text: String,
    pub style: SpanStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineBlock {
    pub alignment: Alignment,
    pub spans: Vec<StyledSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StanzaBlock {
    /// Stanza identifier, kept as the block key.
    pub key: String,
    pub lines: Vec<LineBlock>,
}

/// Rendered poem ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoemView {
    pub poem_id: PoemId,
    pub stanzas: Vec<StanzaBlock>,
}

/// Renders a poem into its visual tree.
pub fn render_poem(poem: &Poem) -> PoemView {
    PoemView {
        poem_id: poem.id,
        stanzas: poem.stanzas.iter().map(render_stanza).collect(),
    }
}

/// Decodes a JSON poem document and renders it.
///
/// # Errors
/// - `RenderError::MalformedDocument` when a required field is missing or a
///   container has the wrong type.
pub fn render_document(raw: &str) -> Result<PoemView, RenderError> {
    let poem = Poem::from_json(raw)?;
    Ok(render_poem(&poem))
}

fn render_stanza(stanza: &Stanza) -> StanzaBlock {
    StanzaBlock {
        key: stanza.id.clone(),
        lines: stanza.lines.iter().map(render_line).collect(),
    }
}

fn render_line(line: &Line) -> LineBlock {
    LineBlock {
        alignment: line.effective_alignment(),
        spans: line.runs.iter().map(render_run).collect(),
    }
}

fn render_run(run: &TextRun) -> StyledSpan {
    StyledSpan {
        text: run.text.clone(),
        style: SpanStyle {
            bold: run.bold,
            italic: run.italic,
            underline: run.underline,
        },
    }
}
