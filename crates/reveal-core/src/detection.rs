//! Detection model — the uniform finding shape every rule emits (spec §5).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Bugs / correctness
    B,
    /// Complexity
    C,
    /// Documentation
    D,
    /// Style / errors (line length, formatting)
    E,
    /// Front matter / schema validation
    F,
    /// Imports
    I,
    /// Links
    L,
    /// Metrics (file/function length)
    M,
    /// Infrastructure (nginx, Docker)
    N,
    /// Quality
    Q,
    /// Self-validation (dev-mode only)
    V,
}

impl Category {
    /// Parse the leading letter(s) of a rule code, e.g. `"I004"` -> `I`.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code.chars().next()? {
            'B' => Self::B,
            'C' => Self::C,
            'D' => Self::D,
            'E' => Self::E,
            'F' => Self::F,
            'I' => Self::I,
            'L' => Self::L,
            'M' => Self::M,
            'N' => Self::N,
            'Q' => Self::Q,
            'V' => Self::V,
            _ => return None,
        })
    }

    pub fn prefix(self) -> char {
        match self {
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
            Self::E => 'E',
            Self::F => 'F',
            Self::I => 'I',
            Self::L => 'L',
            Self::M => 'M',
            Self::N => 'N',
            Self::Q => 'Q',
            Self::V => 'V',
        }
    }
}

/// A single finding produced by a rule (spec §5).
///
/// `line`/`column` are 1-based; `column` defaults to 1 when a rule can only
/// localize to a line, not a specific offset within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub rule_code: String,
    pub file_path: PathBuf,
    pub line: u32,
    #[serde(default = "default_column")]
    pub column: u32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    pub severity: Severity,
    pub category: Category,
}

fn default_column() -> u32 {
    1
}

impl Detection {
    pub fn new(
        rule_code: impl Into<String>,
        file_path: impl Into<PathBuf>,
        line: u32,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        let rule_code = rule_code.into();
        let category = Category::from_code(&rule_code).unwrap_or(Category::Q);
        Self {
            rule_code,
            file_path: file_path.into(),
            line,
            column: default_column(),
            message: message.into(),
            suggestion: None,
            context: None,
            severity,
            category,
        }
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = column;
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Sort key for stable, deterministic output: file, then line, then column.
    pub fn sort_key(&self) -> (&PathBuf, u32, u32, &str) {
        (&self.file_path, self.line, self.column, self.rule_code.as_str())
    }
}

impl PartialEq for Detection {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}
impl Eq for Detection {}

impl PartialOrd for Detection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Detection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_from_rule_code() {
        assert_eq!(Category::from_code("I004"), Some(Category::I));
        assert_eq!(Category::from_code("V012"), Some(Category::V));
        assert_eq!(Category::from_code(""), None);
    }

    #[test]
    fn column_defaults_to_one() {
        let d = Detection::new("E501", "a.rs", 10, "line too long", Severity::Low);
        assert_eq!(d.column, 1);
    }

    #[test]
    fn detections_sort_by_file_then_line_then_column() {
        let mut ds = vec![
            Detection::new("E501", "b.rs", 5, "x", Severity::Low),
            Detection::new("E501", "a.rs", 10, "x", Severity::Low),
            Detection::new("E501", "a.rs", 2, "x", Severity::Low),
        ];
        ds.sort();
        assert_eq!(ds[0].file_path, PathBuf::from("a.rs"));
        assert_eq!(ds[0].line, 2);
        assert_eq!(ds[2].file_path, PathBuf::from("b.rs"));
    }
}
