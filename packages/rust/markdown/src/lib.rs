//! Document-to-Markdown rendering.
//!
//! Mapping keys become `##` headings, sequence items become `-` list items,
//! and scalars become paragraphs. Every heading and paragraph is followed by
//! a blank line; downstream Markdown linting depends on that spacing.

use tracing::{debug, instrument};

use yamlkit_shared::Document;

/// Two spaces per nesting level.
const INDENT: &str = "  ";

/// Render a document at the top level.
#[instrument(skip_all)]
pub fn render_markdown(doc: &Document) -> String {
    let markdown = render_markdown_at(doc, 0);
    debug!(len = markdown.len(), "markdown rendered");
    markdown
}

/// Render a document whose headings and paragraphs start at `indent` levels.
///
/// Only a nested mapping steps in one level under its heading. Scalar and list
/// values stay at the heading's indent, since an indented paragraph after a
/// blank line would render as a code block.
pub fn render_markdown_at(doc: &Document, indent: usize) -> String {
    let mut out = String::new();
    render_into(doc, indent, &mut out);
    out
}

fn render_into(doc: &Document, indent: usize, out: &mut String) {
    let pad = INDENT.repeat(indent);

    match doc {
        Document::Mapping(map) => {
            for (key, value) in map {
                out.push_str(&format!("{pad}## {key}\n\n"));
                // Only nested mappings step in; paragraphs and lists sit under their heading.
                let child_indent = match value {
                    Document::Mapping(_) => indent + 1,
                    _ => indent,
                };
                render_into(value, child_indent, out);
            }
        }
        Document::Sequence(items) => {
            let item_pad = INDENT.repeat(indent + 1);
            for item in items {
                let rendered = render_markdown_at(item, indent + 1);
                let body = rendered.strip_prefix(&item_pad).unwrap_or(&rendered);
                out.push_str(&format!("{pad}- {body}"));
            }
        }
        Document::Scalar(scalar) => {
            out.push_str(&format!("{pad}{scalar}\n\n"));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
