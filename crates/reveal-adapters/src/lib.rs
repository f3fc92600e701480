//! Reveal Adapters — URI-scheme dispatch over operational resources
//! (spec §4.4).
//!
//! # Overview
//!
//! Where `reveal-core` turns a file into a `StructureDocument`,
//! `reveal-adapters` turns a URI (`ssl://host`, `cpanel://user`,
//! `imports://path`) into the same envelope shape over a live resource —
//! a socket, a filesystem tree, a directory of userdata files. [`uri`]
//! parses the URI syntax; [`adapter`] defines the per-scheme contract
//! every adapter in [`adapters`] implements; [`registry`] maps a scheme
//! string to its adapter factory.
//!
//! `imports://` is the one adapter fully implemented here (spec §4.4,
//! "Scheme parsing for `imports://`"); `ssl://`, `domain://`, and
//! `cpanel://` are thin contract stubs — they satisfy the bind/structure/
//! element/help contract without performing the network or cPanel-API
//! probing spec §1 places out of scope.

pub mod adapter;
pub mod adapters;
pub mod registry;
pub mod uri;

pub use adapter::{Adapter, AdapterError, AdapterHelp, BoundAdapter, SourceType};
pub use registry::SchemeRegistry;
pub use uri::Uri;
