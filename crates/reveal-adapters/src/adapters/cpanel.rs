//! `cpanel://` adapter — thin contract stub (spec §1, "bespoke operational
//! probes" are out of scope). Grounded on `adapters/cpanel/adapter.py`'s
//! docstring: filesystem-based inspection of `/var/cpanel/userdata/` and
//! `/var/cpanel/ssl/apache_tls/`, element vocabulary `domains|ssl|acl-check`.
//! The actual userdata/cert-directory parsing is not reimplemented here.

use crate::adapter::{envelope, Adapter, AdapterError, AdapterHelp, BoundAdapter, HelpExample, SourceType, CONTRACT_VERSION};
use crate::uri::Uri;
use serde_json::{json, Value};

const ELEMENTS: &[&str] = &["domains", "ssl", "acl-check"];

pub struct CpanelAdapter {
    user: String,
}

impl Adapter for CpanelAdapter {
    fn bind(uri: &Uri) -> Result<Self, AdapterError> {
        if uri.authority.is_empty() {
            return Err(AdapterError::Unbound("cpanel:// needs a username".to_string()));
        }
        Ok(CpanelAdapter { user: uri.authority.clone() })
    }

    fn help() -> AdapterHelp {
        let mut elements = std::collections::BTreeMap::new();
        elements.insert("domains", "Addon domains with docroots and home directory");
        elements.insert("ssl", "Disk-cert health per domain from apache_tls");
        elements.insert("acl-check", "nobody ACL health per domain docroot");
        AdapterHelp {
            name: "cpanel",
            description: "Filesystem-based inspection of a cPanel user environment",
            syntax: "cpanel://username[/domains|ssl|acl-check]",
            elements,
            examples: vec![HelpExample {
                uri: "cpanel://deploy/domains",
                description: "List addon domains for user 'deploy'",
                output_type: "cpanel_domains",
            }],
        }
    }
}

impl BoundAdapter for CpanelAdapter {
    fn get_structure(&self) -> Value {
        envelope(
            CONTRACT_VERSION,
            "cpanel_user",
            &format!("cpanel://{}", self.user),
            SourceType::Directory,
            json!({
                "status": "not_implemented",
                "next_steps": ELEMENTS.iter().map(|e| format!("cpanel://{}/{e}", self.user)).collect::<Vec<_>>(),
            }),
        )
    }

    fn get_element(&self, name: &str) -> Option<Value> {
        if !ELEMENTS.contains(&name) {
            return None;
        }
        Some(envelope(
            CONTRACT_VERSION,
            &format!("cpanel_{}", name.replace('-', "_")),
            &format!("cpanel://{}/{name}", self.user),
            SourceType::Directory,
            json!({ "status": "not_implemented" }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_requires_a_username() {
        let uri = Uri { scheme: "cpanel".into(), authority: String::new(), element: None, query: Default::default() };
        assert!(matches!(CpanelAdapter::bind(&uri), Err(AdapterError::Unbound(_))));
    }

    #[test]
    fn get_element_rejects_unknown_names() {
        let uri = Uri::parse("cpanel://deploy").unwrap();
        let adapter = CpanelAdapter::bind(&uri).unwrap();
        assert!(adapter.get_element("bogus").is_none());
        assert!(adapter.get_element("acl-check").is_some());
    }
}
