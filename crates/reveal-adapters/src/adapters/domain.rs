//! `domain://` adapter — thin contract stub (spec §1, OUT OF SCOPE: "DNS,
//! WHOIS"). Grounded on `adapters/domain/adapter.py`'s element vocabulary
//! (`dns|whois|ssl|registrar`) and its cross-adapter composition with
//! `ssl://` (spec §4.4, "Batch and cross-adapter composition"); the DNS
//! resolver and WHOIS client themselves are not reimplemented.

use crate::adapter::{envelope, Adapter, AdapterError, AdapterHelp, BoundAdapter, HelpExample, SourceType, CONTRACT_VERSION};
use crate::uri::Uri;
use serde_json::{json, Value};

const ELEMENTS: &[&str] = &["dns", "whois", "ssl", "registrar"];

pub struct DomainAdapter {
    name: String,
}

impl Adapter for DomainAdapter {
    fn bind(uri: &Uri) -> Result<Self, AdapterError> {
        if uri.authority.is_empty() {
            return Err(AdapterError::Unbound("domain:// needs a DNS name".to_string()));
        }
        Ok(DomainAdapter { name: uri.authority.clone() })
    }

    fn help() -> AdapterHelp {
        let mut elements = std::collections::BTreeMap::new();
        elements.insert("dns", "A/AAAA/MX/TXT record summary");
        elements.insert("whois", "Registrar and expiry from WHOIS");
        elements.insert("ssl", "Delegates to the ssl:// adapter for this domain's certificate");
        elements.insert("registrar", "Registrar contact and nameserver delegation");
        AdapterHelp {
            name: "domain",
            description: "Domain health overview: DNS resolution, WHOIS, and delegated SSL status",
            syntax: "domain://name[/dns|whois|ssl|registrar]",
            elements,
            examples: vec![HelpExample {
                uri: "domain://example.com/dns",
                description: "DNS record summary for example.com",
                output_type: "domain_dns",
            }],
        }
    }
}

impl BoundAdapter for DomainAdapter {
    fn get_structure(&self) -> Value {
        envelope(
            CONTRACT_VERSION,
            "domain_overview",
            &format!("domain://{}", self.name),
            SourceType::Network,
            json!({
                "status": "not_implemented",
                "next_steps": ELEMENTS.iter().map(|e| format!("domain://{}/{e}", self.name)).collect::<Vec<_>>(),
            }),
        )
    }

    fn get_element(&self, name: &str) -> Option<Value> {
        if !ELEMENTS.contains(&name) {
            return None;
        }
        Some(envelope(
            CONTRACT_VERSION,
            &format!("domain_{name}"),
            &format!("domain://{}/{name}", self.name),
            SourceType::Network,
            json!({ "status": "not_implemented" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_requires_a_name() {
        let uri = Uri { scheme: "domain".into(), authority: String::new(), element: None, query: Default::default() };
        assert!(matches!(DomainAdapter::bind(&uri), Err(AdapterError::Unbound(_))));
    }

    #[test]
    fn get_element_rejects_unknown_names() {
        let uri = Uri::parse("domain://example.com").unwrap();
        let adapter = DomainAdapter::bind(&uri).unwrap();
        assert!(adapter.get_element("bogus").is_none());
        assert!(adapter.get_element("dns").is_some());
    }
}
