//! L-series: Markdown link hygiene (spec §4.3, grounded on
//! `test_link_rules_l004_l005.py`).

use super::{Rule, RuleContext};
use crate::detection::{Detection, Severity};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap())
}

/// L001: in-document `#anchor` links must resolve to a real heading slug.
pub struct L001;
impl Rule for L001 {
    fn code(&self) -> &'static str {
        "L001"
    }
    fn message(&self) -> &'static str {
        "link references an anchor that doesn't match any heading"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md", ".markdown"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        let Some(structure) = ctx.structure else { return Vec::new() };
        let slugs: std::collections::HashSet<String> =
            structure.category("headings").iter().map(|h| slugify(&h.name)).collect();

        let mut out = Vec::new();
        for (idx, line) in ctx.content.lines().enumerate() {
            for cap in link_regex().captures_iter(line) {
                let target = &cap[2];
                let Some(anchor) = target.strip_prefix('#') else { continue };
                if !slugs.contains(anchor) {
                    out.push(
                        Detection::new(
                            self.code(),
                            ctx.path.to_path_buf(),
                            idx as u32 + 1,
                            format!("anchor '#{anchor}' does not match any heading"),
                            self.severity(),
                        )
                        .with_context(cap[0].to_string()),
                    );
                }
            }
        }
        out
    }
}

fn slugify(heading: &str) -> String {
    heading
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn is_in_docs_dir(path: &Path) -> bool {
    path.parent()
        .map(|p| p.file_name().map(|n| n == "docs").unwrap_or(false))
        .unwrap_or(false)
}

/// L004: a `docs/` directory should have a `README.md`/`INDEX.md` entry point.
pub struct L004;
impl Rule for L004 {
    fn code(&self) -> &'static str {
        "L004"
    }
    fn message(&self) -> &'static str {
        "documentation directory is missing an index"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        if !is_in_docs_dir(ctx.path) {
            return Vec::new();
        }
        let Some(dir) = ctx.path.parent() else { return Vec::new() };
        let has_index = ["README.md", "INDEX.md", "readme.md", "index.md"]
            .iter()
            .any(|name| dir.join(name).exists());
        if has_index {
            return Vec::new();
        }
        vec![Detection::new(self.code(), ctx.path.to_path_buf(), 1, self.message(), self.severity())
            .with_suggestion("Add a README.md as the directory's navigation entry point")]
    }
}

const DOCS_SKIP_FILES: &[&str] = &["README.md", "INDEX.md", "CHANGELOG.md"];

/// L005: documentation pages should cross-reference at least two other docs.
pub struct L005;
impl Rule for L005 {
    fn code(&self) -> &'static str {
        "L005"
    }
    fn message(&self) -> &'static str {
        "documentation has low cross-reference density"
    }
    fn severity(&self) -> Severity {
        Severity::Low
    }
    fn file_patterns(&self) -> &'static [&'static str] {
        &[".md"]
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection> {
        const MIN_CROSS_REFS: usize = 2;
        if !is_in_docs_dir(ctx.path) {
            return Vec::new();
        }
        let file_name = ctx.path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if DOCS_SKIP_FILES.iter().any(|skip| skip.eq_ignore_ascii_case(file_name)) {
            return Vec::new();
        }

        let count = count_internal_md_links(ctx.content, ctx.path);
        if count >= MIN_CROSS_REFS {
            return Vec::new();
        }
        vec![Detection::new(self.code(), ctx.path.to_path_buf(), 1, self.message(), self.severity())
            .with_suggestion("Add a \"See Also\" section linking related documentation")]
    }
}

/// Count `.md` links that point at a different file than `current_file`,
/// ignoring external (`http(s)://`) links.
fn count_internal_md_links(content: &str, current_file: &Path) -> usize {
    let current_name = current_file.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    link_regex()
        .captures_iter(content)
        .filter(|cap| {
            let target = &cap[2];
            if target.starts_with("http://") || target.starts_with("https://") {
                return false;
            }
            if !target.ends_with(".md") {
                return false;
            }
            let target_name = target.rsplit('/').next().unwrap_or(target);
            target_name != current_name
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::structure::extractors::markdown;

    fn thresholds() -> Thresholds {
        Thresholds::default()
    }

    #[test]
    fn l001_flags_broken_anchor() {
        let source = "# Title\n\n[link](#missing)\n";
        let doc = markdown::extract(source).unwrap();
        let t = thresholds();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: None,
            thresholds: &t,
            dev_mode: false,
        };
        assert_eq!(L001.check(&ctx).len(), 1);
    }

    #[test]
    fn l001_passes_matching_anchor() {
        let source = "# My Title\n\n[link](#my-title)\n";
        let doc = markdown::extract(source).unwrap();
        let t = thresholds();
        let ctx = RuleContext {
            path: Path::new("a.md"),
            structure: Some(&doc),
            content: source,
            schema: None,
            thresholds: &t,
            dev_mode: false,
        };
        assert!(L001.check(&ctx).is_empty());
    }

    #[test]
    fn l004_skips_non_docs_directory() {
        let t = thresholds();
        let ctx = RuleContext {
            path: Path::new("/some/path/src/file.md"),
            structure: None,
            content: "# Content",
            schema: None,
            thresholds: &t,
            dev_mode: false,
        };
        assert!(L004.check(&ctx).is_empty());
    }

    #[test]
    fn l005_counts_internal_links_excluding_self_and_external() {
        let content = "Link to self: [This Guide](./GUIDE.md)\nExternal: [Py](https://python.org)\nOne real ref: [Other](./OTHER.md)\n";
        assert_eq!(count_internal_md_links(content, Path::new("/project/docs/GUIDE.md")), 1);
    }

    #[test]
    fn l005_skips_readme_and_changelog() {
        let t = thresholds();
        for name in ["/project/docs/README.md", "/project/docs/CHANGELOG.md"] {
            let ctx = RuleContext {
                path: Path::new(name),
                structure: None,
                content: "# Title\nNo refs.",
                schema: None,
                thresholds: &t,
                dev_mode: false,
            };
            assert!(L005.check(&ctx).is_empty());
        }
    }
}
