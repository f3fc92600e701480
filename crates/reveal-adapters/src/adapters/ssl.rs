//! `ssl://` adapter — thin contract stub (spec §1, "OUT OF SCOPE: bespoke
//! operational probes... SSL socket fetch"). Grounded on
//! `adapters/ssl/adapter.py`'s `get_help()`/`get_schema()` shape for the
//! element vocabulary and help metadata; the actual certificate fetch over
//! a TLS socket is not reimplemented here — `get_structure`/`get_element`
//! return the envelope with a `status: "not_implemented"` placeholder body
//! rather than probing the network.

use crate::adapter::{envelope, Adapter, AdapterError, AdapterHelp, BoundAdapter, HelpExample, SourceType, CONTRACT_VERSION};
use crate::uri::Uri;
use serde_json::{json, Value};

const ELEMENTS: &[&str] = &["san", "chain", "issuer", "subject", "dates", "full"];

pub struct SslAdapter {
    host: String,
}

impl Adapter for SslAdapter {
    fn bind(uri: &Uri) -> Result<Self, AdapterError> {
        if uri.authority.is_empty() {
            return Err(AdapterError::Unbound("ssl:// needs a host".to_string()));
        }
        Ok(SslAdapter { host: uri.authority.clone() })
    }

    fn help() -> AdapterHelp {
        let mut elements = std::collections::BTreeMap::new();
        elements.insert("san", "Subject Alternative Names on the leaf certificate");
        elements.insert("chain", "Full certificate chain as presented by the server");
        elements.insert("issuer", "Issuing CA");
        elements.insert("subject", "Certificate subject");
        elements.insert("dates", "notBefore/notAfter validity window");
        elements.insert("full", "Every field above in one response");
        AdapterHelp {
            name: "ssl",
            description: "TLS certificate inspection over a live socket connection",
            syntax: "ssl://host[:port][/san|chain|issuer|subject|dates|full]",
            elements,
            examples: vec![HelpExample {
                uri: "ssl://example.com/san",
                description: "List SANs on example.com's certificate",
                output_type: "ssl_san",
            }],
        }
    }
}

impl BoundAdapter for SslAdapter {
    fn get_structure(&self) -> Value {
        envelope(
            CONTRACT_VERSION,
            "ssl_certificate",
            &format!("ssl://{}", self.host),
            SourceType::Network,
            json!({
                "status": "not_implemented",
                "next_steps": ELEMENTS.iter().map(|e| format!("ssl://{}/{e}", self.host)).collect::<Vec<_>>(),
            }),
        )
    }

    fn get_element(&self, name: &str) -> Option<Value> {
        if !ELEMENTS.contains(&name) {
            return None;
        }
        Some(envelope(
            CONTRACT_VERSION,
            &format!("ssl_{name}"),
            &format!("ssl://{}/{name}", self.host),
            SourceType::Network,
            json!({ "status": "not_implemented" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_requires_a_host() {
        let uri = Uri { scheme: "ssl".into(), authority: String::new(), element: None, query: Default::default() };
        assert!(matches!(SslAdapter::bind(&uri), Err(AdapterError::Unbound(_))));
    }

    #[test]
    fn get_element_rejects_unknown_names() {
        let uri = Uri::parse("ssl://example.com").unwrap();
        let adapter = SslAdapter::bind(&uri).unwrap();
        assert!(adapter.get_element("bogus").is_none());
        assert!(adapter.get_element("san").is_some());
    }

    #[test]
    fn get_structure_echoes_source_and_type() {
        let uri = Uri::parse("ssl://example.com").unwrap();
        let adapter = SslAdapter::bind(&uri).unwrap();
        let structure = adapter.get_structure();
        assert_eq!(structure["type"], "ssl_certificate");
        assert_eq!(structure["source_type"], "network");
    }
}
