//! Structure Document — the uniform intermediate representation (spec §3)
//!
//! ARCHITECTURE: A `StructureDocument` is a mapping from category name to an
//! ordered sequence of `Item`s. It is built on demand per file and discarded
//! after rendering/checking — it holds no reference back to its source, so
//! it can outlive the byte buffer it was extracted from.

pub mod grammar;
pub mod extractors;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Current wire-format revision; bump on any breaking field change (spec §6).
pub const CONTRACT_VERSION: &str = "1.0";

/// A single structural item: a class, function, import, heading, directive, ...
///
/// Invariant (spec §3): `1 <= line <= line_end`. `name` is the identifier as
/// written in source, including unicode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub line: u32,
    pub line_end: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_type: Option<String>,

    /// UTF-8 byte interval this item spans, used by the element index to
    /// compute containment without re-deriving it from line numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_range: Option<(usize, usize)>,

    /// Extra category-specific fields that don't warrant their own column
    /// (nginx `listen`, Dockerfile `ARG` default, XML attribute maps, ...).
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub extra: FxHashMap<String, serde_json::Value>,
}

impl Item {
    pub fn new(name: impl Into<String>, line: u32, line_end: u32) -> Self {
        Self {
            name: name.into(),
            line,
            line_end,
            signature: None,
            decorators: Vec::new(),
            depth: None,
            complexity: None,
            content: None,
            text: None,
            text_type: None,
            byte_range: None,
            extra: FxHashMap::default(),
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn with_byte_range(mut self, range: (usize, usize)) -> Self {
        self.byte_range = Some(range);
        self
    }

    pub fn with_complexity(mut self, complexity: u32) -> Self {
        self.complexity = Some(complexity);
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = Some(depth);
        self
    }
}

/// `{showing, total}` envelope recorded when a category was truncated by a
/// slicing option (`head`/`tail`/`range`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filtered {
    pub showing: usize,
    pub total: usize,
}

/// The structure document itself: category name -> ordered items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureDocument {
    pub categories: FxHashMap<String, Vec<Item>>,

    /// Set when a format-specific parser truncated a huge category
    /// (JSONL preview rows, XML children over the top-level threshold).
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub filtered: FxHashMap<String, Filtered>,

    /// Set when this document came from the similarity-based fallback
    /// extractor rather than a real grammar/format parser (spec §4.1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_language: Option<String>,

    /// Present when the underlying parser recovered from a malformed source
    /// and only partial structure could be produced (spec §4.1, §7).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StructureDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, name: &str) -> &[Item] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn push(&mut self, category: &str, item: Item) {
        self.categories.entry(category.to_string()).or_default().push(item);
    }

    pub fn category_names(&self) -> impl Iterator<Item = &String> {
        self.categories.keys()
    }

    pub fn total_items(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// All items across every category, in (category, item) pairs — used to
    /// build the element index, which is category-agnostic about siblings.
    pub fn all_items(&self) -> impl Iterator<Item = (&str, &Item)> {
        self.categories
            .iter()
            .flat_map(|(cat, items)| items.iter().map(move |i| (cat.as_str(), i)))
    }

    /// Validate the line invariant from spec §8: `1 <= line <= line_end <= total_lines`.
    pub fn validate_line_invariant(&self, total_lines: u32) -> std::result::Result<(), String> {
        for (cat, item) in self.all_items() {
            if item.line == 0 || item.line > item.line_end || item.line_end > total_lines {
                return Err(format!(
                    "{cat}/{}: invalid line range {}..{} (file has {total_lines} lines)",
                    item.name, item.line, item.line_end
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_category_roundtrip() {
        let mut doc = StructureDocument::new();
        doc.push("functions", Item::new("foo", 1, 3));
        assert_eq!(doc.category("functions").len(), 1);
        assert_eq!(doc.category("classes").len(), 0);
    }

    #[test]
    fn line_invariant_catches_inverted_range() {
        let mut doc = StructureDocument::new();
        doc.push("functions", Item::new("bad", 5, 2));
        assert!(doc.validate_line_invariant(100).is_err());
    }

    #[test]
    fn json_roundtrip_is_equivalent() {
        let mut doc = StructureDocument::new();
        doc.push("functions", Item::new("foo", 1, 3).with_signature("fn foo()"));
        let json = serde_json::to_string(&doc).unwrap();
        let back: StructureDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.category("functions"), back.category("functions"));
    }
}
