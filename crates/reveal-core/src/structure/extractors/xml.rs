//! XML extractor — streaming parser with nesting, namespaces, and scalar
//! type inference on leaf text (spec §3, §4.1, §8).
//!
//! Top-level children are truncated past a threshold and the truncation is
//! recorded in `StructureDocument::filtered` rather than silently dropped
//! (spec §8: "XML document exceeding the 10-child top-level threshold is
//! truncated with `filtered: {showing: 10, total: N}`").

use crate::error::{RevealError, Result};
use crate::structure::{Filtered, Item, StructureDocument};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

const TOP_LEVEL_CHILD_LIMIT: usize = 10;

pub fn extract(source: &str) -> Result<StructureDocument> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut doc = StructureDocument::new();
    let mut depth = 0u32;
    let mut line = 1u32;
    let mut top_level_count = 0usize;
    let mut namespaces: Vec<String> = Vec::new();
    let mut root_seen = false;
    let mut element_count = 0u32;
    let mut text_buffer = String::new();

    loop {
        let pos_before = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                element_count += 1;
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                for attr in e.attributes().flatten() {
                    let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
                    if key == "xmlns" || key.starts_with("xmlns:") {
                        let ns = String::from_utf8_lossy(&attr.value).to_string();
                        if !namespaces.contains(&ns) {
                            namespaces.push(ns);
                        }
                    }
                }

                if depth == 1 {
                    if !root_seen {
                        doc.push("root", Item::new(name.clone(), line, line));
                        root_seen = true;
                    }
                } else if depth == 2 {
                    top_level_count += 1;
                    if top_level_count <= TOP_LEVEL_CHILD_LIMIT {
                        doc.push("children", Item::new(name, line, line));
                    }
                }
                text_buffer.clear();
            }
            Ok(Event::Text(t)) => {
                text_buffer.push_str(&t.unescape().unwrap_or_default());
            }
            Ok(Event::End(_)) => {
                if depth == 2 && top_level_count <= TOP_LEVEL_CHILD_LIMIT {
                    if let Some(last) = doc.categories.get_mut("children").and_then(|v| v.last_mut()) {
                        last.text = Some(text_buffer.trim().to_string());
                        last.text_type = Some(infer_scalar_type(text_buffer.trim()));
                    }
                }
                depth = depth.saturating_sub(1);
                text_buffer.clear();
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                doc.error = Some(format!("XML parse error: {e}"));
                break;
            }
        }
        line += count_newlines(source, pos_before as usize, reader.buffer_position() as usize);
    }

    if top_level_count > TOP_LEVEL_CHILD_LIMIT {
        doc.filtered.insert(
            "children".to_string(),
            Filtered { showing: TOP_LEVEL_CHILD_LIMIT, total: top_level_count },
        );
    }

    let mut stats = Item::new("statistics", 1, line.max(1));
    stats.extra.insert("element_count".to_string(), serde_json::json!(element_count));
    stats.extra.insert("top_level_children".to_string(), serde_json::json!(top_level_count));
    doc.push("statistics", stats);

    for ns in namespaces {
        doc.push("namespaces", Item::new(ns, 1, 1));
    }

    if doc.error.is_some() && !root_seen {
        return Err(RevealError::ParseError(doc.error.clone().unwrap_or_default()));
    }
    Ok(doc)
}

fn count_newlines(source: &str, from: usize, to: usize) -> u32 {
    let from = from.min(source.len());
    let to = to.min(source.len());
    if to <= from {
        return 0;
    }
    source.as_bytes()[from..to].iter().filter(|&&b| b == b'\n').count() as u32
}

/// Infer the scalar kind of a text value: integer, float, boolean, or string.
fn infer_scalar_type(text: &str) -> String {
    if text.is_empty() {
        return "empty".to_string();
    }
    if text.parse::<i64>().is_ok() {
        "integer".to_string()
    } else if text.parse::<f64>().is_ok() {
        "float".to_string()
    } else if matches!(text, "true" | "false") {
        "boolean".to_string()
    } else {
        "string".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_root_and_children_with_types() {
        let xml = "<root><a>1</a><b>true</b><c>hello</c></root>";
        let doc = extract(xml).unwrap();
        assert_eq!(doc.category("root")[0].name, "root");
        let children = doc.category("children");
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].text_type.as_deref(), Some("integer"));
        assert_eq!(children[1].text_type.as_deref(), Some("boolean"));
        assert_eq!(children[2].text_type.as_deref(), Some("string"));
    }

    #[test]
    fn truncates_past_ten_children() {
        let mut xml = String::from("<root>");
        for i in 0..15 {
            xml.push_str(&format!("<item{i}>{i}</item{i}>"));
        }
        xml.push_str("</root>");
        let doc = extract(&xml).unwrap();
        assert_eq!(doc.category("children").len(), 10);
        assert_eq!(doc.filtered["children"], Filtered { showing: 10, total: 15 });
    }

    #[test]
    fn collects_xmlns_namespaces() {
        let xml = "<root xmlns:foo=\"urn:foo\"><a/></root>";
        let doc = extract(xml).unwrap();
        assert_eq!(doc.category("namespaces").len(), 1);
        assert_eq!(doc.category("namespaces")[0].name, "urn:foo");
    }
}
