//! HTML markup emission for rendered poems.
//!
//! Text is escaped as element content and stanza keys as double-quoted
//! attribute values.

use crate::render::tree::{LineBlock, PoemView, StanzaBlock, StyledSpan};
use std::fmt::Write;

const POEM_STYLE: &str = "max-width:600px;padding:20px";
const LINE_INDENT: &str = "margin-left:20px";

/// Emits the visual tree as HTML markup.
pub fn to_html(view: &PoemView) -> String {
    let mut out = String::new();
    let _ = write!(out, "<div class=\"poem\" style=\"{POEM_STYLE}\">");
    for stanza in &view.stanzas {
        write_stanza(&mut out, stanza);
    }
    out.push_str("</div>");
    out
}

fn write_stanza(out: &mut String, stanza: &StanzaBlock) {
    let _ = write!(
        out,
        "<div class=\"stanza\" data-stanza-id=\"{}\">",
        html_escape::encode_double_quoted_attribute(&stanza.key)
    );
    for line in &stanza.lines {
        write_line(out, line);
    }
    out.push_str("</div>");
}

fn write_line(out: &mut String, line: &LineBlock) {
    let _ = write!(
        out,
        "<div class=\"line\" style=\"{LINE_INDENT};text-align:{}\">",
        line.alignment.as_str()
    );
    for span in &line.spans {
        write_span(out, span);
    }
    out.push_str("</div>");
}

fn write_span(out: &mut String, span: &StyledSpan) {
    let _ = write!(
        out,
        "<span style=\"font-weight:{};font-style:{};text-decoration:{}\">{}</span>",
        span.style.font_weight(),
        span.style.font_style(),
        span.style.text_decoration(),
        html_escape::encode_text(&span.text)
    );
}
