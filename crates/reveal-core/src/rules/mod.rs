//! Rule Registry & Engine (spec §4.3)
//!
//! ARCHITECTURE: each rule is a small stateless `Rule` implementation keyed
//! by a code like `C901` or `I004`. Discovery is static (a fixed table
//! built at startup, mirroring the teacher's `inventory`-free module-load
//! registration) rather than filesystem scanning, since every rule ships
//! inside this crate.

pub mod bugs;
pub mod complexity;
pub mod engine;
pub mod frontmatter;
pub mod imports;
pub mod infra;
pub mod links;
pub mod maintainability;
pub mod registry;
pub mod style;
pub mod validation;

use crate::config::Thresholds;
use crate::detection::{Detection, Severity};
use crate::schema::Schema;
use crate::structure::StructureDocument;
use std::path::Path;

/// Everything a rule's `check` needs. Front-matter validation's schema is
/// passed in here rather than through process-global state, so the engine
/// stays safe to call from multiple worker tasks concurrently (spec §5).
pub struct RuleContext<'a> {
    pub path: &'a Path,
    pub structure: Option<&'a StructureDocument>,
    pub content: &'a str,
    pub schema: Option<&'a Schema>,
    pub thresholds: &'a Thresholds,
    /// `true` when `path` is a `reveal://` self-scan URI *and* the process
    /// is running from a development checkout (spec §4.3, V-series).
    pub dev_mode: bool,
}

/// A single analysis rule, identified by its `code` (spec §4.3).
pub trait Rule: Send + Sync {
    fn code(&self) -> &'static str;
    fn message(&self) -> &'static str;
    fn severity(&self) -> Severity;

    /// Glob-ish suffix patterns: `*` matches any file, `.py` matches a
    /// suffix, `reveal://` matches a self-scan URI (spec §4.3).
    fn file_patterns(&self) -> &'static [&'static str];

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn check(&self, ctx: &RuleContext) -> Vec<Detection>;

    /// `true` when `path` matches this rule's declared `file_patterns`
    /// (spec §4.3, Applicability).
    fn applies_to(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.file_patterns().iter().any(|pattern| match *pattern {
            "*" => true,
            "reveal://" => path_str.starts_with("reveal://"),
            suffix => path_str.ends_with(suffix),
        })
    }
}

/// The full set of rules known to this build, in registration order (spec
/// §5: "rule execution within a file preserves rule registration order").
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(bugs::B002),
        Box::new(bugs::B003),
        Box::new(bugs::B004),
        Box::new(complexity::C901::default()),
        Box::new(complexity::C905::default()),
        Box::new(style::E501::default()),
        Box::new(frontmatter::F001),
        Box::new(frontmatter::F002),
        Box::new(frontmatter::F003),
        Box::new(frontmatter::F004),
        Box::new(frontmatter::F005),
        Box::new(imports::I001),
        Box::new(imports::I004),
        Box::new(links::L001),
        Box::new(links::L004),
        Box::new(links::L005),
        Box::new(maintainability::M101::default()),
        Box::new(infra::N001),
        Box::new(infra::N002),
        Box::new(infra::N003),
        Box::new(infra::N004),
        Box::new(validation::V003),
        Box::new(validation::V007),
        Box::new(validation::V011),
        Box::new(validation::V012),
        Box::new(validation::V013),
        Box::new(validation::V015),
        Box::new(validation::V016),
        Box::new(validation::V017),
        Box::new(validation::V018),
        Box::new(validation::V019),
        Box::new(validation::V020),
        Box::new(validation::V021),
    ]
}
