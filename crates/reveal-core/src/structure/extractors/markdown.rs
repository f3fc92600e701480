//! Markdown extractor: headings + front-matter (spec §4.1, §6)
//!
//! ARCHITECTURE: grounded in the teacher's `extract_markdown_headers`
//! traversal (ATX and Setext heading node kinds, depth-first with an
//! explicit stack to bound recursion) but produces structure `Item`s
//! instead of a stripped-down text blob. Front matter is stripped before
//! heading extraction and surfaced as its own `frontmatter` category.

use crate::error::{RevealError, Result};
use crate::structure::grammar::{GrammarLanguage, Parser};
use crate::structure::{Item, StructureDocument};
use tree_sitter::Node;

const MAX_DEPTH: usize = 500;
const MAX_HEADERS: usize = 10_000;

pub fn extract(source: &str) -> Result<StructureDocument> {
    let mut doc = StructureDocument::new();

    let (frontmatter_text, body) = split_frontmatter(source);
    if let Some(fm) = frontmatter_text {
        if let Ok(value) = serde_yaml_ng::from_str::<serde_json::Value>(fm) {
            let mut item = Item::new("frontmatter", 1, fm.lines().count() as u32 + 2);
            item.extra.insert("value".to_string(), value);
            doc.push("frontmatter", item);
        }
    }

    let mut parser = Parser::new(GrammarLanguage::Markdown)?;
    let tree = parser.parse(source)?;
    let mut headers = 0usize;
    let mut stack = vec![(0usize, tree.root_node())];
    while let Some((depth, node)) = stack.pop() {
        if depth > MAX_DEPTH {
            return Err(RevealError::ParseError(format!("maximum markdown depth exceeded: {MAX_DEPTH}")));
        }
        if headers > MAX_HEADERS {
            return Err(RevealError::ParseError(format!("too many markdown headers: over {MAX_HEADERS}")));
        }

        match node.kind() {
            "atx_heading" => {
                if let Some(level) = atx_level(node) {
                    push_heading(node, source.as_bytes(), level, &mut doc);
                    headers += 1;
                }
            }
            "setext_heading" => {
                let level = setext_level(node);
                push_heading(node, source.as_bytes(), level, &mut doc);
                headers += 1;
            }
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            stack.push((depth + 1, child));
        }
    }

    let _ = body; // body text itself isn't part of the structure document
    Ok(doc)
}

fn push_heading(node: Node, source: &[u8], level: u32, doc: &mut StructureDocument) {
    let (line, line_end) = (node.start_position().row as u32 + 1, node.end_position().row as u32 + 1);
    let text = std::str::from_utf8(&source[node.start_byte()..node.end_byte()])
        .unwrap_or("")
        .trim_start_matches('#')
        .trim()
        .lines()
        .next()
        .unwrap_or("")
        .to_string();
    let item = Item::new(text, line, line_end)
        .with_depth(level)
        .with_byte_range((node.start_byte(), node.end_byte()));
    doc.push("headings", item);
}

fn atx_level(node: Node) -> Option<u32> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .find(|c| c.kind().starts_with("atx_h") && c.kind().ends_with("_marker"))
        .and_then(|marker| marker.kind().chars().find(|c| c.is_ascii_digit()))
        .and_then(|c| c.to_digit(10))
}

fn setext_level(node: Node) -> u32 {
    let mut cursor = node.walk();
    let underline = node
        .children(&mut cursor)
        .find(|c| matches!(c.kind(), "setext_h1_underline" | "setext_h2_underline"));
    match underline.map(|u| u.kind()) {
        Some("setext_h1_underline") => 1,
        _ => 2,
    }
}

/// Split a leading `---`-delimited front-matter block off the document body.
/// Returns `(frontmatter_text, remaining_body)`.
fn split_frontmatter(source: &str) -> (Option<&str>, &str) {
    let trimmed = source.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("---\n").or_else(|| trimmed.strip_prefix("---\r\n")) else {
        return (None, source);
    };
    if let Some(end) = find_closing_delimiter(rest) {
        let fm = &rest[..end];
        let body_start = rest[end..].find('\n').map(|i| end + i + 1).unwrap_or(rest.len());
        (Some(fm), &rest[body_start..])
    } else {
        (None, source)
    }
}

fn find_closing_delimiter(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" || trimmed == "..." {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_headings_with_levels() {
        let source = "# Title\n\nSome text.\n\n## Section\n\nMore text.\n";
        let doc = extract(source).unwrap();
        let headings = doc.category("headings");
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].name, "Title");
        assert_eq!(headings[0].depth, Some(1));
        assert_eq!(headings[1].name, "Section");
        assert_eq!(headings[1].depth, Some(2));
    }

    #[test]
    fn strips_and_parses_frontmatter() {
        let source = "---\ntitle: Hello\ndate: 2026-01-02\n---\n\n# Body\n";
        let doc = extract(source).unwrap();
        assert_eq!(doc.category("frontmatter").len(), 1);
        assert_eq!(doc.category("headings").len(), 1);
    }

    #[test]
    fn no_frontmatter_is_fine() {
        let source = "# Just a heading\n";
        let doc = extract(source).unwrap();
        assert!(doc.category("frontmatter").is_empty());
        assert_eq!(doc.category("headings").len(), 1);
    }
}
