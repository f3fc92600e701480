//! `scheme://authority[/element][?query]` parsing (spec §4.4, "URI parsing").
//!
//! The authority's meaning is adapter-specific — host for `ssl://`, a
//! filesystem root for `imports://`, a username for `cpanel://` — this
//! module only splits the syntax; adapters interpret the pieces.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uri {
    pub scheme: String,
    pub authority: String,
    pub element: Option<String>,
    pub query: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UriError {
    #[error("URI has no scheme: '{0}'")]
    MissingScheme(String),
    #[error("URI has no authority: '{0}'")]
    MissingAuthority(String),
}

impl Uri {
    /// Parse `scheme://authority[/element][?k=v&...]`.
    pub fn parse(raw: &str) -> Result<Uri, UriError> {
        let Some((scheme, rest)) = raw.split_once("://") else {
            return Err(UriError::MissingScheme(raw.to_string()));
        };

        let (path_part, query_part) = match rest.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (rest, None),
        };

        // `imports://` authorities are filesystem roots, which may contain
        // their own `/` separators (`imports://src/app`) — the whole path is
        // the authority there; `imports://` selects element kinds via query
        // flags (spec §4.4, "Scheme parsing for imports://"), not a path
        // segment. Other schemes' authorities are a single token (host,
        // username, DNS name) with an optional single `/element` suffix.
        let (authority, element) = if scheme == "imports" {
            (path_part, None)
        } else {
            match path_part.split_once('/') {
                Some((a, e)) if !e.is_empty() => (a, Some(e.to_string())),
                Some((a, _)) => (a, None),
                None => (path_part, None),
            }
        };
        if authority.is_empty() {
            return Err(UriError::MissingAuthority(raw.to_string()));
        }

        let mut query = BTreeMap::new();
        if let Some(q) = query_part {
            for pair in q.split('&').filter(|p| !p.is_empty()) {
                match pair.split_once('=') {
                    Some((k, v)) => {
                        query.insert(k.to_string(), v.to_string());
                    }
                    None => {
                        query.insert(pair.to_string(), String::new());
                    }
                }
            }
        }

        Ok(Uri { scheme: scheme.to_string(), authority: authority.to_string(), element, query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scheme_authority_element_and_query() {
        let uri = Uri::parse("imports://src/app?unused&format=json").unwrap();
        assert_eq!(uri.scheme, "imports");
        assert_eq!(uri.authority, "src/app");
        assert_eq!(uri.element, None);
        assert_eq!(uri.query.get("unused"), Some(&String::new()));
        assert_eq!(uri.query.get("format"), Some(&"json".to_string()));
    }

    #[test]
    fn splits_authority_from_element_segment() {
        let uri = Uri::parse("ssl://example.com/san").unwrap();
        assert_eq!(uri.authority, "example.com");
        assert_eq!(uri.element, Some("san".to_string()));
    }

    #[test]
    fn rejects_missing_scheme() {
        assert!(matches!(Uri::parse("not-a-uri"), Err(UriError::MissingScheme(_))));
    }

    #[test]
    fn rejects_empty_authority() {
        assert!(matches!(Uri::parse("ssl:///san"), Err(UriError::MissingAuthority(_))));
    }
}
