//! Adapter contract (spec §4.4). No `base.py` survives in the retrieval
//! pack for this contract — the trait below is grounded directly on the
//! spec's five numbered adapter contracts rather than a source file; see
//! `DESIGN.md`.

use crate::uri::Uri;
use serde_json::Value;
use std::collections::BTreeMap;

/// Closed vocabulary for `source_type` (contract 2): adapters must choose
/// one of these five values, never an open string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    File,
    Directory,
    Database,
    Runtime,
    Network,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::File => "file",
            SourceType::Directory => "directory",
            SourceType::Database => "database",
            SourceType::Runtime => "runtime",
            SourceType::Network => "network",
        }
    }
}

/// Error taxonomy for adapter binding and resolution (spec §7: Input error,
/// Binding error).
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Contract 1: constructing an adapter with no URI string must fail
    /// this way so the dispatcher can fall through to the next scheme.
    #[error("adapter needs a resource: {0}")]
    Unbound(String),
    #[error("malformed URI: {0}")]
    InvalidUri(String),
    #[error("unknown element: {0}")]
    UnknownElement(String),
}

/// Static help metadata (contract 5).
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdapterHelp {
    pub name: &'static str,
    pub description: &'static str,
    pub syntax: &'static str,
    pub elements: BTreeMap<&'static str, &'static str>,
    pub examples: Vec<HelpExample>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct HelpExample {
    pub uri: &'static str,
    pub description: &'static str,
    pub output_type: &'static str,
}

/// Object-safe half of the contract: what the dispatcher calls once an
/// adapter instance is bound to a concrete URI.
pub trait BoundAdapter {
    /// Contract 2: `get_structure()` returns the overview envelope.
    fn get_structure(&self) -> Value;

    /// Contract 3: `get_element(name)` returns a narrower envelope, or
    /// `None` when the dispatcher should report "Element not found".
    fn get_element(&self, name: &str) -> Option<Value>;
}

/// Full per-scheme contract: a type implementing this both binds from a
/// URI (contract 1) and, once bound, behaves as a [`BoundAdapter`].
pub trait Adapter: BoundAdapter + Sized {
    fn bind(uri: &Uri) -> Result<Self, AdapterError>;
    fn help() -> AdapterHelp;
}

/// Builds the envelope every adapter response shares (contract 2/3):
/// `contract_version`, `type`, `source`, `source_type`, plus adapter-specific
/// fields merged in from `extra`.
pub fn envelope(contract_version: &str, type_tag: &str, source: &str, source_type: SourceType, extra: Value) -> Value {
    let mut map = serde_json::Map::new();
    map.insert("contract_version".into(), Value::String(contract_version.to_string()));
    map.insert("type".into(), Value::String(type_tag.to_string()));
    map.insert("source".into(), Value::String(source.to_string()));
    map.insert("source_type".into(), Value::String(source_type.as_str().to_string()));
    if let Value::Object(fields) = extra {
        map.extend(fields);
    }
    Value::Object(map)
}

pub const CONTRACT_VERSION: &str = "1.0";
