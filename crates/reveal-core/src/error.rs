//! Error taxonomy for the analysis engine
//!
//! ARCHITECTURE: One variant per error kind in spec §7. Resource/Parse/Rule/
//! Schema errors are recovered locally wherever possible (embedded in a
//! structure document or skipped); only Input/Binding/Contract errors ever
//! propagate to a caller as a hard failure.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for reveal-core operations
#[derive(Debug, Error)]
pub enum RevealError {
    /// No extractor registered for this file's extension/name
    #[error("unsupported file type: {0}")]
    UnsupportedLanguage(PathBuf),

    /// A grammar or format-specific parser could not produce any structure
    #[error("failed to parse source: {0}")]
    ParseError(String),

    /// tree-sitter grammar failed to load
    #[error("tree-sitter language error: {0}")]
    TreeSitterError(#[from] tree_sitter::LanguageError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration (bad env override, malformed threshold, ...)
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// UTF-8 decoding error while slicing a byte range
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    /// Front-matter or validation-rule schema is malformed
    #[error("schema error: {0}")]
    SchemaError(String),

    /// A rule selection expression referenced an unknown code or prefix
    #[error("invalid rule selection: {0}")]
    SelectionError(String),
}

/// Result alias used throughout reveal-core
pub type Result<T> = std::result::Result<T, RevealError>;
