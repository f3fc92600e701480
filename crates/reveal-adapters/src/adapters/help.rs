//! `help://<topic>` — not a resource adapter in the Adapter-trait sense (it
//! has no external resource to bind to or fail to bind); the CLI special-
//! cases this scheme and calls [`topic`]/[`topics`] directly rather than
//! going through the scheme registry's `dispatch`. Grounded on spec §4.4's
//! fifth contract ("a static `get_help()` method") applied uniformly
//! across every registered adapter.

use crate::adapter::{Adapter, AdapterHelp};
use crate::adapters::{cpanel::CpanelAdapter, domain::DomainAdapter, imports::ImportsAdapter, ssl::SslAdapter};

/// Help metadata for every registered adapter, in scheme-registry order.
pub fn topics() -> Vec<AdapterHelp> {
    vec![ImportsAdapter::help(), SslAdapter::help(), DomainAdapter::help(), CpanelAdapter::help()]
}

/// Help metadata for one named adapter, or `None` for an unknown topic.
pub fn topic(name: &str) -> Option<AdapterHelp> {
    topics().into_iter().find(|h| h.name == name)
}
