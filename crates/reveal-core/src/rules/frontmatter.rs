//! F-series: front-matter schema validation (spec §4.5). These rules only
//! fire when `ctx.schema` is set — the caller resolves a schema (by name or
//! by file discovery) and threads it through per-call, never globally
//! (spec §5, parallel-safety).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};
use crate::schema::expr;

fn frontmatter_value<'a>(ctx: &'a RuleContext) -> Option<&'a serde_json::Value> {
    ctx.structure?.category("frontmatter").first()?.extra.get("value")
}

/// F001: the file has no front matter at all.
pub struct F001;
impl Rule for F001 {
    fn code(&self) -> &'static str {
        "F001"
    }
    fn message(&self) -> &'static str {
        "missing front matter"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(_schema) = ctx.schema else { return Vec::new() };
        let Some(structure) = ctx.structure else { return Vec::new() };
        if !structure.category("frontmatter").is_empty() {
            return Vec::new();
        }
        vec![Detection::new(self.code(), ctx.path.to_path_buf(), 1, self.message(), self.severity())
            .with_suggestion("Add a YAML front-matter block at the top of the file")]
    }
}

/// F002: front matter is present but empty (`---\n---`).
pub struct F002;
impl Rule for F002 {
    fn code(&self) -> &'static str {
        "F002"
    }
    fn message(&self) -> &'static str {
        "front matter is empty"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(_schema) = ctx.schema else { return Vec::new() };
        let Some(item) = ctx.structure.and_then(|s| s.category("frontmatter").first()) else { return Vec::new() };
        let is_empty = match item.extra.get("value") {
            None => true,
            Some(v) => v.is_null() || v.as_object().map(|o| o.is_empty()).unwrap_or(false),
        };
        if !is_empty {
            return Vec::new();
        }
        vec![Detection::new(self.code(), ctx.path.to_path_buf(), 1, self.message(), self.severity())]
    }
}

/// F003: a required field declared by the schema is absent.
pub struct F003;
impl Rule for F003 {
    fn code(&self) -> &'static str {
        "F003"
    }
    fn message(&self) -> &'static str {
        "required front-matter field is missing"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(schema) = ctx.schema else { return Vec::new() };
        let Some(value) = frontmatter_value(ctx) else { return Vec::new() };
        let Some(obj) = value.as_object() else { return Vec::new() };

        schema
            .required_fields
            .iter()
            .filter(|field| !obj.contains_key(field.as_str()))
            .map(|field| {
                Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    1,
                    format!("required field '{field}' is missing from front matter"),
                    self.severity(),
                )
                .with_suggestion(format!("Add '{field}:' to the front-matter block"))
            })
            .collect()
    }
}

/// F004: a field's value does not match its schema-declared type.
pub struct F004;
impl Rule for F004 {
    fn code(&self) -> &'static str {
        "F004"
    }
    fn message(&self) -> &'static str {
        "front-matter field has the wrong type"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(schema) = ctx.schema else { return Vec::new() };
        let Some(value) = frontmatter_value(ctx) else { return Vec::new() };
        let Some(obj) = value.as_object() else { return Vec::new() };

        let mut out = Vec::new();
        for (field, field_value) in obj {
            let Some(expected) = schema.field_type(field) else { continue };
            if expected.matches(field_value) {
                continue;
            }
            out.push(Detection::new(
                self.code(),
                ctx.path.to_path_buf(),
                1,
                format!("field '{field}' does not match declared type {expected:?}"),
                self.severity(),
            ));
        }
        out
    }
}

/// F005: a schema-declared custom check expression evaluates false.
pub struct F005;
impl Rule for F005 {
    fn code(&self) -> &'static str {
        "F005"
    }
    fn message(&self) -> &'static str {
        "front-matter custom check failed"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(schema) = ctx.schema else { return Vec::new() };
        let Some(value) = frontmatter_value(ctx) else { return Vec::new() };
        let Some(obj) = value.as_object() else { return Vec::new() };

        schema
            .validation_rules
            .iter()
            .filter_map(|rule| {
                let field_value = obj.get(&rule.field)?;
                if expr::evaluate(&rule.check, field_value) {
                    return None;
                }
                Some(
                    Detection::new(self.code(), ctx.path.to_path_buf(), 1, rule.message.clone(), self.severity())
                        .with_context(format!("field '{}' failed check '{}'", rule.field, rule.check)),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::schema::Schema;
    use crate::structure::extractors::markdown;
    use rustc_hash::FxHashMap;
    use std::path::Path;

    fn schema() -> Schema {
        let mut field_types = FxHashMap::default();
        field_types.insert("date".to_string(), "date".to_string());
        Schema {
            name: "test".to_string(),
            required_fields: vec!["title".to_string()],
            optional_fields: vec![],
            field_types,
            validation_rules: vec![],
        }
    }

    #[test]
    fn f001_flags_missing_frontmatter() {
        let source = "# Title\nBody.\n";
        let doc = markdown::extract(source).unwrap();
        let t = Thresholds::default();
        let s = schema();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: Some(&s),
            thresholds: &t,
            dev_mode: false,
        };
        assert_eq!(F001.check(&ctx).len(), 1);
    }

    #[test]
    fn f003_flags_missing_required_field() {
        let source = "---\ndate: 2026-01-02\n---\n# Title\n";
        let doc = markdown::extract(source).unwrap();
        let t = Thresholds::default();
        let s = schema();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: Some(&s),
            thresholds: &t,
            dev_mode: false,
        };
        let detections = F003.check(&ctx);
        assert_eq!(detections.len(), 1);
        assert!(detections[0].message.contains("title"));
    }

    #[test]
    fn f004_flags_wrong_type() {
        let source = "---\ntitle: My Post\ndate: not-a-date\n---\n# Title\n";
        let doc = markdown::extract(source).unwrap();
        let t = Thresholds::default();
        let s = schema();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: Some(&s),
            thresholds: &t,
            dev_mode: false,
        };
        assert_eq!(F004.check(&ctx).len(), 1);
    }

    #[test]
    fn no_schema_means_no_detections() {
        let source = "# Title\nBody.\n";
        let doc = markdown::extract(source).unwrap();
        let t = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: None,
            thresholds: &t,
            dev_mode: false,
        };
        assert!(F001.check(&ctx).is_empty());
    }
}
