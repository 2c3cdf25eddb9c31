//! Translation of captured search-tool output into styled markup.
//!
//! The translator is a pure function of the full accumulated text: callers
//! re-run it on every new chunk instead of tracking what changed. ANSI color
//! codes are resolved first, the semantic rule table is applied to each line's
//! plain text, and the resulting [`RenderedDocument`] is written out as one
//! preformatted markup block.

pub mod ansi;
pub mod document;
pub mod rules;
pub mod theme;
pub mod writer;

pub use document::{ColorSpan, DocumentLine, RenderedDocument, StyleClass};
pub use theme::MarkupTheme;
pub use writer::MarkupWriter;

use ansi::AnsiLine;
use rules::{apply_rules, compiled_rules, LineClaims};

/// Translates raw terminal text into a styled document.
///
/// Total over arbitrary input: malformed escapes are stripped or kept as
/// literal text, never reported as errors.
pub fn translate(raw: &str) -> RenderedDocument {
    if raw.is_empty() {
        return RenderedDocument::default();
    }
    let rules = compiled_rules();
    let lines = ansi::decode_lines(raw)
        .into_iter()
        .map(|line| {
            let claims = apply_rules(rules, &line.text);
            build_line(&line, &claims)
        })
        .collect::<Vec<DocumentLine>>();
    RenderedDocument::new(lines)
}

fn build_line(line: &AnsiLine, claims: &LineClaims) -> DocumentLine {
    if claims.rule {
        return DocumentLine::Rule;
    }
    let mut spans: Vec<ColorSpan> = Vec::new();
    for (offset, ch) in line.text.char_indices() {
        let style = claims
            .style_at(offset)
            .unwrap_or_else(|| line.style_at(offset));
        match spans.last_mut() {
            Some(last) if last.style == style => last.text.push(ch),
            _ => spans.push(ColorSpan::new(style, ch.to_string())),
        }
    }
    DocumentLine::Text(spans)
}

/// Writes a document as a single preformatted markup block.
///
/// Line breaks are kept as-is; a rule line is a block element and takes the
/// place of its own line break.
pub fn render_markup(document: &RenderedDocument, theme: &MarkupTheme) -> String {
    let mut writer = MarkupWriter::new();
    let lines = document.lines();
    for (index, line) in lines.iter().enumerate() {
        match line {
            DocumentLine::Rule => writer.horizontal_rule(&theme.rule),
            DocumentLine::Text(spans) => {
                for span in spans {
                    match theme.color_for(span.style) {
                        Some(color) => {
                            writer.open_span(color);
                            writer.text(&span.text);
                            writer.close_span();
                        }
                        None => writer.text(&span.text),
                    }
                }
                if index + 1 < lines.len() {
                    writer.line_break();
                }
            }
        }
    }
    writer.finish()
}

pub fn translate_to_markup(raw: &str, theme: &MarkupTheme) -> String {
    render_markup(&translate(raw), theme)
}

#[cfg(test)]
#[path = "../tests/markup_tests.rs"]
mod tests;
