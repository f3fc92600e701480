//! Schema Validator — front-matter schema loading and type checks (spec §4.5).

pub mod expr;

use crate::error::{RevealError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    List,
    Dict,
    Integer,
    Boolean,
    Date,
}

impl FieldType {
    fn parse(tag: &str) -> Option<Self> {
        Some(match tag {
            "string" => Self::String,
            "list" => Self::List,
            "dict" => Self::Dict,
            "integer" => Self::Integer,
            "boolean" => Self::Boolean,
            "date" => Self::Date,
            _ => return None,
        })
    }

    /// Type-check `value` per spec §4.5's per-tag rules: booleans are
    /// rejected as integers, numbers/booleans rejected as strings, etc.
    pub fn matches(self, value: &serde_json::Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::List => value.is_array(),
            Self::Dict => value.is_object(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::Date => match value.as_str() {
                Some(s) => is_date_like(s),
                None => false,
            },
        }
    }
}

fn is_date_like(s: &str) -> bool {
    let is_plain_date = s.len() == 10
        && s.as_bytes()[4] == b'-'
        && s.as_bytes()[7] == b'-'
        && s[0..4].bytes().all(|b| b.is_ascii_digit())
        && s[5..7].bytes().all(|b| b.is_ascii_digit())
        && s[8..10].bytes().all(|b| b.is_ascii_digit());
    is_plain_date || is_rfc3339_like(s)
}

fn is_rfc3339_like(s: &str) -> bool {
    s.len() >= 19 && s.as_bytes().get(10) == Some(&b'T') && is_date_like(&s[..10])
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRule {
    pub code: String,
    pub field: String,
    pub check: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub optional_fields: Vec<String>,
    #[serde(default)]
    pub field_types: FxHashMap<String, String>,
    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

impl Schema {
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.field_types.get(field).and_then(|tag| FieldType::parse(tag))
    }
}

/// Resolve a schema by built-in name, falling back to treating `name_or_path`
/// as a filesystem path to a YAML schema document (spec §4.5).
pub fn load_schema(name_or_path: &str) -> Result<Schema> {
    if let Some(schema) = builtin_schema(name_or_path) {
        return Ok(schema);
    }
    let text = std::fs::read_to_string(name_or_path)?;
    serde_yaml_ng::from_str(&text).map_err(|e| RevealError::SchemaError(e.to_string()))
}

pub fn list_builtin_schemas() -> &'static [&'static str] {
    &["beth", "hugo", "jekyll", "mkdocs", "obsidian"]
}

fn builtin_schema(name: &str) -> Option<Schema> {
    let mut field_types = FxHashMap::default();
    let (required, optional, types): (&[&str], &[&str], &[(&str, &str)]) = match name {
        "beth" => (
            &["title", "date"],
            &["tags", "draft"],
            &[("title", "string"), ("date", "date"), ("tags", "list"), ("draft", "boolean")],
        ),
        "hugo" => (
            &["title", "date"],
            &["tags", "categories", "draft", "weight"],
            &[
                ("title", "string"),
                ("date", "date"),
                ("tags", "list"),
                ("categories", "list"),
                ("draft", "boolean"),
                ("weight", "integer"),
            ],
        ),
        "jekyll" => (
            &["layout", "title"],
            &["date", "categories", "tags", "permalink"],
            &[
                ("layout", "string"),
                ("title", "string"),
                ("date", "date"),
                ("categories", "list"),
                ("tags", "list"),
                ("permalink", "string"),
            ],
        ),
        "mkdocs" => (
            &["title"],
            &["description", "template", "hide"],
            &[("title", "string"), ("description", "string"), ("template", "string"), ("hide", "list")],
        ),
        "obsidian" => (
            &[],
            &["tags", "aliases", "cssclass"],
            &[("tags", "list"), ("aliases", "list"), ("cssclass", "string")],
        ),
        _ => return None,
    };
    for (field, ty) in types {
        field_types.insert(field.to_string(), ty.to_string());
    }
    Some(Schema {
        name: name.to_string(),
        required_fields: required.iter().map(|s| s.to_string()).collect(),
        optional_fields: optional.iter().map(|s| s.to_string()).collect(),
        field_types,
        validation_rules: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booleans_are_rejected_as_integers() {
        assert!(!FieldType::Integer.matches(&serde_json::json!(true)));
        assert!(FieldType::Integer.matches(&serde_json::json!(5)));
    }

    #[test]
    fn strict_date_format_is_enforced() {
        assert!(FieldType::Date.matches(&serde_json::json!("2026-01-02")));
        assert!(!FieldType::Date.matches(&serde_json::json!("Jan 2 2026")));
        assert!(FieldType::Date.matches(&serde_json::json!("2026-01-02T10:00:00Z")));
    }

    #[test]
    fn builtin_schemas_are_resolvable_by_name() {
        let schema = load_schema("hugo").unwrap();
        assert_eq!(schema.field_type("draft"), Some(FieldType::Boolean));
    }
}
