//! Scheme Registry (spec §4.4, §2: "Map URI schemes to adapter and renderer
//! implementations"). Renderers are out of scope (spec §1, "OUT OF SCOPE");
//! this registry only maps a scheme string to an adapter factory.

use crate::adapter::{AdapterError, BoundAdapter};
use crate::uri::Uri;
use rustc_hash::FxHashMap;

type Factory = Box<dyn Fn(&Uri) -> Result<Box<dyn BoundAdapter>, AdapterError> + Send + Sync>;

pub struct SchemeRegistry {
    factories: FxHashMap<&'static str, Factory>,
}

impl SchemeRegistry {
    pub fn new() -> Self {
        let mut registry = Self { factories: FxHashMap::default() };
        registry.register("imports", |uri| {
            crate::adapters::imports::ImportsAdapter::bind(uri).map(|a| Box::new(a) as Box<dyn BoundAdapter>)
        });
        registry.register("ssl", |uri| {
            crate::adapters::ssl::SslAdapter::bind(uri).map(|a| Box::new(a) as Box<dyn BoundAdapter>)
        });
        registry.register("domain", |uri| {
            crate::adapters::domain::DomainAdapter::bind(uri).map(|a| Box::new(a) as Box<dyn BoundAdapter>)
        });
        registry.register("cpanel", |uri| {
            crate::adapters::cpanel::CpanelAdapter::bind(uri).map(|a| Box::new(a) as Box<dyn BoundAdapter>)
        });
        registry
    }

    fn register<F>(&mut self, scheme: &'static str, factory: F)
    where
        F: Fn(&Uri) -> Result<Box<dyn BoundAdapter>, AdapterError> + Send + Sync + 'static,
    {
        self.factories.insert(scheme, Box::new(factory));
    }

    /// Dispatch a parsed URI to its scheme's adapter, binding it. Returns
    /// an `InvalidUri` error for an unregistered scheme (spec §7, Input
    /// error: "scheme unknown").
    pub fn dispatch(&self, uri: &Uri) -> Result<Box<dyn BoundAdapter>, AdapterError> {
        match self.factories.get(uri.scheme.as_str()) {
            Some(factory) => factory(uri),
            None => Err(AdapterError::InvalidUri(format!("unknown scheme: {}", uri.scheme))),
        }
    }

    pub fn schemes(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for SchemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_known_scheme() {
        let registry = SchemeRegistry::new();
        let uri = Uri::parse("imports://.").unwrap();
        assert!(registry.dispatch(&uri).is_ok());
    }

    #[test]
    fn rejects_unknown_scheme() {
        let registry = SchemeRegistry::new();
        let uri = Uri::parse("gopher://example").unwrap();
        assert!(matches!(registry.dispatch(&uri), Err(AdapterError::InvalidUri(_))));
    }

    #[test]
    fn lists_registered_schemes_sorted() {
        let registry = SchemeRegistry::new();
        assert_eq!(registry.schemes(), vec!["cpanel", "domain", "imports", "ssl"]);
    }
}
