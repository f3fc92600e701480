//! V-series: self-validation rules (spec §4.3, §9). These only fire when
//! `ctx.path` is the `reveal://` self-scan sentinel and `ctx.dev_mode` is
//! set (computed once in `lib.rs::check_file` from the same development-
//! checkout detection spec §4.3 describes). V012/V016 are grounded on
//! `V012.py`/`V016.py`; V003/V007/V011/V013/V015/V018/V019/V020/V021 have no
//! `original_source/` counterpart (neither a `.py` file nor a kept test
//! exercises them) and are grounded directly on spec §4.3's one-line
//! description of each code — see DESIGN.md for the honest accounting of
//! which is which.

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};
use crate::structure::grammar::GrammarLanguage;
use crate::util;
use regex::Regex;
use std::path::{Path, PathBuf};

fn is_reveal_uri(path: &Path) -> bool {
    path.to_str().map(|s| s.starts_with("reveal://")).unwrap_or(false)
}

/// Every V-rule gates on both the `reveal://` sentinel path and the
/// already-computed `ctx.dev_mode` flag, rather than re-deriving "is this a
/// dev checkout" itself.
fn applies(ctx: &RuleContext) -> bool {
    is_reveal_uri(ctx.path) && ctx.dev_mode
}

/// `reveal://` self-validation has no real file path to anchor from, so it
/// always starts the project-root walk from the process's working
/// directory.
fn find_project_root() -> Option<PathBuf> {
    util::find_project_root(&std::env::current_dir().ok()?)
}

/// `.rs` files directly under `crates/reveal-adapters/src/adapters`,
/// excluding `mod.rs` — the one-file-per-scheme adapters V016/V018/V019/V020
/// all scan.
fn adapter_source_files(root: &Path) -> Vec<PathBuf> {
    let dir = root.join("crates").join("reveal-adapters").join("src").join("adapters");
    let Ok(entries) = std::fs::read_dir(&dir) else { return Vec::new() };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("rs"))
        .filter(|p| p.file_name().and_then(|n| n.to_str()) != Some("mod.rs"))
        .collect()
}

/// V012: the README's claimed "N languages built-in" must match the
/// registry's actual count.
pub struct V012;
impl Rule for V012 {
    fn code(&self) -> &'static str {
        "V012"
    }
    fn message(&self) -> &'static str {
        "language count mismatch in documentation"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let readme = root.join("README.md");
        let Ok(content) = std::fs::read_to_string(&readme) else { return Vec::new() };
        let Some(claimed) = extract_claimed_count(&content) else { return Vec::new() };

        let actual = GrammarLanguage::ALL.len();
        if claimed == actual {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            PathBuf::from("README.md"),
            1,
            format!("language count mismatch: claims {claimed}, actual {actual}"),
            self.severity(),
        )
        .with_suggestion(format!("Update README.md to '{actual} languages built-in' or verify the count logic"))
        .with_context(format!("claimed: {claimed}, actual: {actual} registered languages"))]
    }
}

fn extract_claimed_count(readme: &str) -> Option<usize> {
    let patterns = [
        r"(?i)(\d+)\s+languages?\s+built-in",
        r"Built-in\s*\((\d+)\):",
        r"(?i)Zero config\.\s*(\d+)\s+languages",
    ];
    for pattern in patterns {
        if let Ok(re) = Regex::new(pattern) {
            if let Some(cap) = re.captures(readme) {
                if let Ok(n) = cap[1].parse() {
                    return Some(n);
                }
            }
        }
    }
    None
}

/// V016: every adapter module implements `get_help()` for discoverability.
pub struct V016;
impl Rule for V016 {
    fn code(&self) -> &'static str {
        "V016"
    }
    fn message(&self) -> &'static str {
        "adapter missing get_help() implementation"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };

        let mut out = Vec::new();
        for path in adapter_source_files(&root) {
            let Ok(content) = std::fs::read_to_string(&path) else { continue };
            if content.contains("fn get_help(") {
                continue;
            }
            let display = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            out.push(
                Detection::new(self.code(), display, 1, self.message(), self.severity()).with_suggestion(
                    "Implement fn get_help() -> AdapterHelp returning name/description/examples/syntax",
                ),
            );
        }
        out
    }
}

const MIN_FUNCTION_NODE_TYPES: usize = 5;
const MIN_CLASS_NODE_TYPES: usize = 3;

/// V017: every grammar binding exposes enough node-kind vocabulary to
/// reliably classify functions and classes, and carries `simple_identifier`
/// whenever it also carries `identifier` (Kotlin/Swift split the two).
pub struct V017;
impl Rule for V017 {
    fn code(&self) -> &'static str {
        "V017"
    }
    fn message(&self) -> &'static str {
        "grammar node-type coverage is insufficient"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        // Markdown has no grammar-driven function/class concept; it is
        // covered by the dedicated markdown extractor, not tree-sitter.
        let mut out = Vec::new();
        for lang in GrammarLanguage::ALL.iter().filter(|l| **l != GrammarLanguage::Markdown) {
            let grammar = lang.tree_sitter_grammar();
            let mut function_kinds = 0usize;
            let mut class_kinds = 0usize;
            let mut has_identifier = false;
            let mut has_simple_identifier = false;

            for id in 0..grammar.node_kind_count() as u16 {
                let Some(kind) = grammar.node_kind_for_id(id) else { continue };
                if !grammar.node_kind_is_named(id) {
                    continue;
                }
                if kind.contains("function") || kind.contains("method") {
                    function_kinds += 1;
                }
                if kind.contains("class") || kind.contains("struct") {
                    class_kinds += 1;
                }
                if kind == "identifier" {
                    has_identifier = true;
                }
                if kind == "simple_identifier" {
                    has_simple_identifier = true;
                }
            }

            if function_kinds < MIN_FUNCTION_NODE_TYPES {
                out.push(Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    1,
                    format!("{} grammar exposes only {function_kinds} function-like node kinds (need >= {MIN_FUNCTION_NODE_TYPES})", lang.name()),
                    self.severity(),
                ));
            }
            if class_kinds < MIN_CLASS_NODE_TYPES {
                out.push(Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    1,
                    format!("{} grammar exposes only {class_kinds} class-like node kinds (need >= {MIN_CLASS_NODE_TYPES})", lang.name()),
                    self.severity(),
                ));
            }
            if has_identifier && !has_simple_identifier && matches!(lang, GrammarLanguage::Kotlin | GrammarLanguage::Swift) {
                out.push(Detection::new(
                    self.code(),
                    ctx.path.to_path_buf(),
                    1,
                    format!("{} grammar has 'identifier' but no 'simple_identifier'", lang.name()),
                    self.severity(),
                ));
            }
        }
        out
    }
}

/// Non-tree-sitter structure extractors (dockerfile/markdown/nginx/xml/jsonl)
/// that V003 expects to carry `line_end` on every item they emit.
fn outline_extractor_files(root: &Path) -> Vec<PathBuf> {
    let dir = root.join("crates").join("reveal-core").join("src").join("structure").join("extractors");
    let Ok(entries) = std::fs::read_dir(&dir) else { return Vec::new() };
    entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("rs"))
        .filter(|p| {
            !matches!(p.file_name().and_then(|n| n.to_str()), Some("mod.rs") | Some("treesitter.rs"))
        })
        .collect()
}

/// V003: every structured-format extractor (the non-tree-sitter ones —
/// dockerfile, markdown, nginx, xml, jsonl) emits `line_end` on its items, so
/// `reveal file.xml::Element` can report a range instead of a single line.
pub struct V003;
impl Rule for V003 {
    fn code(&self) -> &'static str {
        "V003"
    }
    fn message(&self) -> &'static str {
        "structured-format extractor does not populate line_end"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };

        let mut out = Vec::new();
        for path in outline_extractor_files(&root) {
            let Ok(content) = std::fs::read_to_string(&path) else { continue };
            if content.contains("line_end") {
                continue;
            }
            let display = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            out.push(
                Detection::new(self.code(), display, 1, self.message(), self.severity())
                    .with_suggestion("Populate line_end on every StructureItem this extractor emits"),
            );
        }
        out
    }
}

/// Package version declared by each workspace member's `Cargo.toml`, read
/// textually rather than through `cargo metadata` (self-validation has no
/// cargo invocation available to it).
fn crate_versions(root: &Path) -> Vec<(String, String)> {
    let members = ["reveal-core", "reveal-adapters", "reveal-cli"];
    let re = Regex::new(r#"(?m)^version\s*=\s*"([^"]+)""#).ok();
    members
        .iter()
        .filter_map(|name| {
            let content = std::fs::read_to_string(root.join("crates").join(name).join("Cargo.toml")).ok()?;
            let version = re.as_ref()?.captures(&content)?[1].to_string();
            Some((name.to_string(), version))
        })
        .collect()
}

/// V007: every workspace member crate declares the same version string.
pub struct V007;
impl Rule for V007 {
    fn code(&self) -> &'static str {
        "V007"
    }
    fn message(&self) -> &'static str {
        "workspace member crates have diverging versions"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let versions = crate_versions(&root);
        let Some((_, first)) = versions.first() else { return Vec::new() };
        if versions.iter().all(|(_, v)| v == first) {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            PathBuf::from("Cargo.toml"),
            1,
            format!(
                "version mismatch across workspace members: {}",
                versions.iter().map(|(n, v)| format!("{n}={v}")).collect::<Vec<_>>().join(", ")
            ),
            self.severity(),
        )
        .with_suggestion("Align every member crate's [package] version")]
    }
}

/// V011: CHANGELOG.md, if present, carries a dated entry for the current
/// version. No CHANGELOG.md in this tree yet, so this recovers locally by
/// reporting nothing rather than inventing a missing-file finding.
pub struct V011;
impl Rule for V011 {
    fn code(&self) -> &'static str {
        "V011"
    }
    fn message(&self) -> &'static str {
        "CHANGELOG.md has no dated entry for the current version"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let Ok(changelog) = std::fs::read_to_string(root.join("CHANGELOG.md")) else { return Vec::new() };
        let Some((_, version)) = crate_versions(&root).into_iter().next() else { return Vec::new() };

        let date_pattern = Regex::new(r"\d{4}-\d{2}-\d{2}").ok();
        let has_entry = changelog.lines().any(|line| {
            line.contains(&version) && date_pattern.as_ref().map(|re| re.is_match(line)).unwrap_or(false)
        });
        if has_entry {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            PathBuf::from("CHANGELOG.md"),
            1,
            format!("no dated entry found for version {version}"),
            self.severity(),
        )
        .with_suggestion(format!("Add a '## {version} - YYYY-MM-DD' entry to CHANGELOG.md"))]
    }
}

/// V013: the README's claimed adapter count matches `SchemeRegistry`'s
/// registered scheme count. `reveal-core` cannot depend on `reveal-adapters`
/// (the dependency points the other way), so the registered count is read
/// textually off `registry.rs`'s `register("scheme", ...)` call sites
/// instead of constructed in-process.
pub struct V013;
impl Rule for V013 {
    fn code(&self) -> &'static str {
        "V013"
    }
    fn message(&self) -> &'static str {
        "adapter count mismatch in documentation"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let readme = root.join("README.md");
        let Ok(readme_content) = std::fs::read_to_string(&readme) else { return Vec::new() };
        let Some(claimed) = extract_claimed_count_for(&readme_content, "adapters?") else { return Vec::new() };

        let registry_path =
            root.join("crates").join("reveal-adapters").join("src").join("registry.rs");
        let Ok(registry_content) = std::fs::read_to_string(&registry_path) else { return Vec::new() };
        let Ok(re) = Regex::new(r#"register\(\s*"[^"]+""#) else { return Vec::new() };
        let actual = re.find_iter(&registry_content).count();

        if claimed == actual {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            PathBuf::from("README.md"),
            1,
            format!("adapter count mismatch: claims {claimed}, actual {actual}"),
            self.severity(),
        )
        .with_suggestion(format!("Update README.md to '{actual} adapters' or verify the count logic"))]
    }
}

/// V015: the README's claimed rule count matches `all_rules()`'s length.
pub struct V015;
impl Rule for V015 {
    fn code(&self) -> &'static str {
        "V015"
    }
    fn message(&self) -> &'static str {
        "rule count mismatch in documentation"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let readme = root.join("README.md");
        let Ok(content) = std::fs::read_to_string(&readme) else { return Vec::new() };
        let Some(claimed) = extract_claimed_count_for(&content, "rules?") else { return Vec::new() };

        let actual = super::all_rules().len();
        if claimed == actual {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            PathBuf::from("README.md"),
            1,
            format!("rule count mismatch: claims {claimed}, actual {actual}"),
            self.severity(),
        )
        .with_suggestion(format!("Update README.md to '{actual} rules' or verify the count logic"))]
    }
}

fn extract_claimed_count_for(readme: &str, noun: &str) -> Option<usize> {
    let pattern = format!(r"(?i)(\d+)\s+{noun}\b");
    let re = Regex::new(&pattern).ok()?;
    re.captures(readme)?[1].parse().ok()
}

/// V018: every adapter module has a matching factory registration in
/// `registry.rs`. This Rust design has a single uniform JSON renderer for
/// every scheme (no per-adapter renderer type to register), so "registered
/// renderer" here means "reachable through the scheme registry's dispatch
/// table" — the closest real equivalent in this architecture.
pub struct V018;
impl Rule for V018 {
    fn code(&self) -> &'static str {
        "V018"
    }
    fn message(&self) -> &'static str {
        "adapter has no scheme-registry entry"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let registry_path =
            root.join("crates").join("reveal-adapters").join("src").join("registry.rs");
        let Ok(registry_content) = std::fs::read_to_string(&registry_path) else { return Vec::new() };

        let mut out = Vec::new();
        for path in adapter_source_files(&root) {
            if path.file_name().and_then(|n| n.to_str()) == Some("help.rs") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            if registry_content.contains(&format!("\"{stem}\"")) {
                continue;
            }
            let display = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            out.push(
                Detection::new(self.code(), display, 1, self.message(), self.severity())
                    .with_suggestion(format!("Register \"{stem}\" in SchemeRegistry::new()")),
            );
        }
        out
    }
}

/// V019: every adapter rejects binding with no resource via a typed error
/// (`AdapterError::Unbound`), rather than panicking or silently no-op-ing.
pub struct V019;
impl Rule for V019 {
    fn code(&self) -> &'static str {
        "V019"
    }
    fn message(&self) -> &'static str {
        "adapter does not raise AdapterError::Unbound for a missing resource"
    }
    fn severity(&self) -> Severity {
        Severity::High
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };

        let mut out = Vec::new();
        for path in adapter_source_files(&root) {
            if path.file_name().and_then(|n| n.to_str()) == Some("help.rs") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else { continue };
            if content.contains("AdapterError::Unbound") {
                continue;
            }
            let display = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            out.push(Detection::new(self.code(), display, 1, self.message(), self.severity()).with_suggestion(
                "Return AdapterError::Unbound(..) from bind() when the authority/resource is empty",
            ));
        }
        out
    }
}

/// V020: an adapter exposing `get_structure` also exposes `get_element`.
/// `BoundAdapter` requires both methods together, so this is enforced by the
/// type system already; the scan exists as a second, independent check of
/// the same contract in case a future refactor splits the trait.
pub struct V020;
impl Rule for V020 {
    fn code(&self) -> &'static str {
        "V020"
    }
    fn message(&self) -> &'static str {
        "adapter implements get_structure without get_element"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };

        let mut out = Vec::new();
        for path in adapter_source_files(&root) {
            if path.file_name().and_then(|n| n.to_str()) == Some("help.rs") {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else { continue };
            let has_structure = content.contains("fn get_structure");
            let has_element = content.contains("fn get_element");
            if has_structure == has_element {
                continue;
            }
            let display = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            out.push(Detection::new(self.code(), display, 1, self.message(), self.severity()));
        }
        out
    }
}

/// V021: tree-sitter-capable languages are parsed by tree-sitter, not
/// regular-expression hacks layered on top. Markdown is exempt — it has no
/// tree-sitter-driven function/class extraction (V017) and is handled by
/// its own dedicated extractor, which is allowed to use regex.
pub struct V021;
impl Rule for V021 {
    fn code(&self) -> &'static str {
        "V021"
    }
    fn message(&self) -> &'static str {
        "tree-sitter extractor falls back to regular expressions"
    }
    fn severity(&self) -> Severity {
        Severity::Medium
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &["reveal://"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !applies(ctx) {
            return Vec::new();
        }
        let Some(root) = find_project_root() else { return Vec::new() };
        let path = root
            .join("crates")
            .join("reveal-core")
            .join("src")
            .join("structure")
            .join("extractors")
            .join("treesitter.rs");
        let Ok(content) = std::fs::read_to_string(&path) else { return Vec::new() };
        if !content.contains("Regex::new") && !content.contains("regex::") {
            return Vec::new();
        }
        vec![Detection::new(
            self.code(),
            path.strip_prefix(&root).unwrap_or(&path).to_path_buf(),
            1,
            self.message(),
            self.severity(),
        )
        .with_suggestion("Extend the tree-sitter grammar's node-kind coverage instead of adding a regex fallback")]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;

    #[test]
    fn v012_extracts_claimed_count_from_common_phrasings() {
        assert_eq!(extract_claimed_count("Zero config. 16 languages built-in."), Some(16));
        assert_eq!(extract_claimed_count("Built-in (16): Python, Rust, ..."), Some(16));
    }

    #[test]
    fn v012_ignores_non_reveal_paths() {
        let t = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("src/lib.rs"),
            structure: None,
            content: "",
            schema: None,
            thresholds: &t,
            dev_mode: true,
        };
        assert!(V012.check(&ctx).is_empty());
    }

    #[test]
    fn v016_ignores_non_reveal_paths() {
        let t = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("src/lib.rs"),
            structure: None,
            content: "",
            schema: None,
            thresholds: &t,
            dev_mode: true,
        };
        assert!(V016.check(&ctx).is_empty());
    }

    #[test]
    fn v017_rust_grammar_has_sufficient_function_and_class_kinds() {
        let t = Thresholds::default();
        let ctx = RuleContext {
            path: Path::new("reveal://."),
            structure: None,
            content: "",
            schema: None,
            thresholds: &t,
            dev_mode: true,
        };
        let detections = V017.check(&ctx);
        let rust_findings: Vec<_> =
            detections.iter().filter(|d| d.message.starts_with("Rust grammar")).collect();
        assert!(rust_findings.is_empty(), "unexpected Rust grammar coverage gaps: {rust_findings:?}");
    }

    fn reveal_ctx(t: &Thresholds, dev_mode: bool) -> RuleContext<'_> {
        RuleContext { path: Path::new("reveal://."), structure: None, content: "", schema: None, thresholds: t, dev_mode }
    }

    #[test]
    fn v_series_ignores_reveal_uri_outside_dev_mode() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, false);
        assert!(V012.check(&ctx).is_empty());
        assert!(V016.check(&ctx).is_empty());
        assert!(V017.check(&ctx).is_empty());
        assert!(V003.check(&ctx).is_empty());
        assert!(V018.check(&ctx).is_empty());
    }

    #[test]
    fn v003_flags_extractor_missing_line_end() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        let detections = V003.check(&ctx);
        let flagged: Vec<_> = detections.iter().map(|d| d.file_path.display().to_string()).collect();
        assert!(flagged.iter().any(|f| f.ends_with("xml.rs")), "expected xml.rs to be flagged: {flagged:?}");
        assert!(flagged.iter().any(|f| f.ends_with("jsonl.rs")), "expected jsonl.rs to be flagged: {flagged:?}");
        assert!(!flagged.iter().any(|f| f.ends_with("markdown.rs")));
    }

    #[test]
    fn v007_workspace_members_currently_share_a_version() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V007.check(&ctx).is_empty());
    }

    #[test]
    fn v011_recovers_locally_when_changelog_is_absent() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V011.check(&ctx).is_empty());
    }

    #[test]
    fn v018_every_adapter_module_has_a_registry_entry() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V018.check(&ctx).is_empty());
    }

    #[test]
    fn v019_every_adapter_raises_unbound_for_a_missing_resource() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V019.check(&ctx).is_empty());
    }

    #[test]
    fn v020_every_adapter_pairs_get_structure_with_get_element() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V020.check(&ctx).is_empty());
    }

    #[test]
    fn v021_treesitter_extractor_has_no_regex_fallback() {
        let t = Thresholds::default();
        let ctx = reveal_ctx(&t, true);
        assert!(V021.check(&ctx).is_empty());
    }
}
