//! Grammar Bindings — per-language parse trees, byte-accurate (spec §4.1)
//!
//! ARCHITECTURE: This is the only module that imports `tree-sitter`
//! directly (mirrors the teacher's `parser` module boundary). Each
//! grammar-driven language declares the node-type sets the structure
//! extractor needs: `function_node_types`, `class_node_types`,
//! `import_node_types`. Name extraction tries both `identifier` and
//! `simple_identifier` to cover Kotlin/Swift (spec §4.1, V017).

use crate::error::{RevealError, Result};
use std::path::{Component, Path};

/// Languages with a tree-sitter grammar binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarLanguage {
    TypeScript,
    JavaScript,
    Python,
    Rust,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Bash,
    Php,
    Scala,
    Kotlin,
    Swift,
    Markdown,
}

impl GrammarLanguage {
    /// Extension -> language table. Filename exact-matches (Dockerfile, nginx
    /// config names) are handled one level up, by the extractor registry.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Some(match ext {
            "ts" | "tsx" => Self::TypeScript,
            "js" | "jsx" | "mjs" | "cjs" => Self::JavaScript,
            "py" | "pyi" => Self::Python,
            "rs" => Self::Rust,
            "go" => Self::Go,
            "java" => Self::Java,
            "c" | "h" => Self::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" => Self::Cpp,
            "cs" => Self::CSharp,
            "rb" => Self::Ruby,
            "sh" | "bash" => Self::Bash,
            "php" => Self::Php,
            "scala" | "sc" => Self::Scala,
            "kt" | "kts" => Self::Kotlin,
            "swift" => Self::Swift,
            "md" | "markdown" => Self::Markdown,
            _ => return None,
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        // Reject parent-directory traversal the same way the teacher's
        // `Language::from_path` does, to keep the contract consistent for
        // any caller that eventually feeds these paths to a cache.
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return None;
        }
        path.extension().and_then(|e| e.to_str()).and_then(Self::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TypeScript => "TypeScript",
            Self::JavaScript => "JavaScript",
            Self::Python => "Python",
            Self::Rust => "Rust",
            Self::Go => "Go",
            Self::Java => "Java",
            Self::C => "C",
            Self::Cpp => "C++",
            Self::CSharp => "C#",
            Self::Ruby => "Ruby",
            Self::Bash => "Bash",
            Self::Php => "PHP",
            Self::Scala => "Scala",
            Self::Kotlin => "Kotlin",
            Self::Swift => "Swift",
            Self::Markdown => "Markdown",
        }
    }

    /// All languages with a grammar binding, for self-validation sweeps (V017).
    pub const ALL: &'static [GrammarLanguage] = &[
        Self::TypeScript,
        Self::JavaScript,
        Self::Python,
        Self::Rust,
        Self::Go,
        Self::Java,
        Self::C,
        Self::Cpp,
        Self::CSharp,
        Self::Ruby,
        Self::Bash,
        Self::Php,
        Self::Scala,
        Self::Kotlin,
        Self::Swift,
        Self::Markdown,
    ];

    /// The underlying tree-sitter grammar, exposed for callers that need to
    /// inspect its raw node-kind vocabulary (V017) rather than our curated
    /// `NodeTypeSets`.
    pub fn tree_sitter_grammar(self) -> tree_sitter::Language {
        self.to_tree_sitter()
    }

    fn to_tree_sitter(self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Go => tree_sitter_go::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
            Self::C => tree_sitter_c::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Self::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            Self::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            Self::Bash => tree_sitter_bash::LANGUAGE.into(),
            Self::Php => tree_sitter_php::LANGUAGE_PHP.into(),
            Self::Scala => tree_sitter_scala::LANGUAGE.into(),
            Self::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
            Self::Swift => tree_sitter_swift::LANGUAGE.into(),
            Self::Markdown => tree_sitter_md::LANGUAGE.into(),
        }
    }

    /// Node-type sets this language's structure extractor walks for.
    pub fn node_types(self) -> NodeTypeSets {
        match self {
            Self::TypeScript | Self::JavaScript => NodeTypeSets {
                function: &["function_declaration", "method_definition", "arrow_function", "function_expression"],
                class: &["class_declaration"],
                import: &["import_statement"],
                interface: &["interface_declaration"],
                type_alias: &["type_alias_declaration"],
                body: &["statement_block"],
            },
            Self::Python => NodeTypeSets {
                function: &["function_definition"],
                class: &["class_definition"],
                import: &["import_statement", "import_from_statement"],
                interface: &[],
                type_alias: &["type_alias_statement"],
                body: &["block"],
            },
            Self::Rust => NodeTypeSets {
                function: &["function_item"],
                class: &["struct_item", "enum_item"],
                import: &["use_declaration"],
                interface: &["trait_item"],
                type_alias: &["type_item"],
                body: &["block"],
            },
            Self::Go => NodeTypeSets {
                function: &["function_declaration", "method_declaration"],
                class: &["type_declaration"],
                import: &["import_declaration"],
                interface: &["interface_type"],
                type_alias: &["type_alias"],
                body: &["block"],
            },
            Self::Java => NodeTypeSets {
                function: &["method_declaration", "constructor_declaration"],
                class: &["class_declaration"],
                import: &["import_declaration"],
                interface: &["interface_declaration"],
                type_alias: &[],
                body: &["block"],
            },
            Self::C => NodeTypeSets {
                function: &["function_definition"],
                class: &["struct_specifier"],
                import: &["preproc_include"],
                interface: &[],
                type_alias: &["type_definition"],
                body: &["compound_statement"],
            },
            Self::Cpp => NodeTypeSets {
                function: &["function_definition"],
                class: &["class_specifier", "struct_specifier"],
                import: &["preproc_include"],
                interface: &[],
                type_alias: &["type_definition", "alias_declaration"],
                body: &["compound_statement"],
            },
            Self::CSharp => NodeTypeSets {
                function: &["method_declaration", "constructor_declaration"],
                class: &["class_declaration", "struct_declaration"],
                import: &["using_directive"],
                interface: &["interface_declaration"],
                type_alias: &[],
                body: &["block"],
            },
            Self::Ruby => NodeTypeSets {
                function: &["method"],
                class: &["class"],
                import: &["call"],
                interface: &["module"],
                type_alias: &[],
                body: &["body_statement"],
            },
            Self::Bash => NodeTypeSets {
                function: &["function_definition"],
                class: &[],
                import: &["command"],
                interface: &[],
                type_alias: &[],
                body: &["compound_statement", "do_group"],
            },
            Self::Php => NodeTypeSets {
                function: &["function_definition", "method_declaration"],
                class: &["class_declaration"],
                import: &["namespace_use_declaration"],
                interface: &["interface_declaration"],
                type_alias: &[],
                body: &["compound_statement"],
            },
            Self::Scala => NodeTypeSets {
                function: &["function_definition"],
                class: &["class_definition", "object_definition"],
                import: &["import_declaration"],
                interface: &["trait_definition"],
                type_alias: &["type_definition"],
                body: &["block"],
            },
            Self::Kotlin => NodeTypeSets {
                function: &["function_declaration"],
                class: &["class_declaration", "object_declaration"],
                import: &["import_header"],
                interface: &["class_declaration"],
                type_alias: &["type_alias"],
                body: &["function_body"],
            },
            Self::Swift => NodeTypeSets {
                function: &["function_declaration"],
                class: &["class_declaration"],
                import: &["import_declaration"],
                interface: &["protocol_declaration"],
                type_alias: &["typealias_declaration"],
                body: &["function_body"],
            },
            Self::Markdown => NodeTypeSets {
                function: &[],
                class: &[],
                import: &[],
                interface: &[],
                type_alias: &[],
                body: &[],
            },
        }
    }
}

/// Node-type sets a grammar-driven extractor walks for, per spec §4.1.
#[derive(Debug, Clone, Copy)]
pub struct NodeTypeSets {
    pub function: &'static [&'static str],
    pub class: &'static [&'static str],
    pub import: &'static [&'static str],
    pub interface: &'static [&'static str],
    pub type_alias: &'static [&'static str],
    /// Node kinds that represent a function/method body block, used to
    /// compute `depth` (max nested block depth inside the body).
    pub body: &'static [&'static str],
}

/// Identifier node kinds tried in order when extracting a name from a node's
/// children — both must be tried to cover Kotlin/Swift (spec §4.1, V017).
pub const IDENTIFIER_NODE_KINDS: &[&str] = &["identifier", "simple_identifier", "type_identifier", "name"];

/// Thin wrapper around `tree_sitter::Parser`, bound to one language.
pub struct Parser {
    language: GrammarLanguage,
    inner: tree_sitter::Parser,
}

impl Parser {
    pub fn new(language: GrammarLanguage) -> Result<Self> {
        let ts_language = language.to_tree_sitter();
        let mut inner = tree_sitter::Parser::new();
        inner.set_language(&ts_language)?;
        Ok(Self { language, inner })
    }

    /// Parse source into a tree. tree-sitter is error-tolerant: malformed
    /// input still yields a tree with ERROR nodes rather than `None`, except
    /// when the parser is misconfigured or the input exceeds internal
    /// limits — only that case becomes `RevealError::ParseError` (spec §4.1,
    /// "a malformed source must not panic").
    pub fn parse(&mut self, source: &str) -> Result<tree_sitter::Tree> {
        self.inner.parse(source, None).ok_or_else(|| {
            RevealError::ParseError(format!("failed to parse {} source", self.language.name()))
        })
    }

    pub fn language(&self) -> GrammarLanguage {
        self.language
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_table_covers_declared_languages() {
        assert_eq!(GrammarLanguage::from_extension("rs"), Some(GrammarLanguage::Rust));
        assert_eq!(GrammarLanguage::from_extension("kt"), Some(GrammarLanguage::Kotlin));
        assert_eq!(GrammarLanguage::from_extension("unknown"), None);
    }

    #[test]
    fn rejects_parent_traversal_paths() {
        assert_eq!(GrammarLanguage::from_path(Path::new("../escape.rs")), None);
    }

    #[test]
    fn parser_is_error_tolerant() {
        let mut parser = Parser::new(GrammarLanguage::Rust).unwrap();
        let tree = parser.parse("fn broken( {{{ ").unwrap();
        assert!(tree.root_node().has_error());
    }
}
