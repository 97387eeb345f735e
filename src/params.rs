//! The parameter source consumed by a filter run.
//!
//! [`Params`] is a flat mapping of string keys to string values, typically
//! the decoded query string of an incoming request. It is
//! `#[serde(transparent)]` over a plain map so web frameworks can
//! deserialize straight into it from their query extractors. Input order is
//! irrelevant; the dispatcher imposes its own deterministic ordering.

use std::collections::HashMap;

use serde::Deserialize;

/// An unordered mapping of parameter names to raw scalar values.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    /// An empty parameter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether `key` is present with a non-empty value.
    ///
    /// An empty string counts as absent, so `search_by=` in a query string
    /// does not select a search column.
    #[must_use]
    pub fn filled(&self, key: &str) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    /// Iterate over all raw key/value pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<HashMap<String, String>> for Params {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_raw_values() {
        let params: Params = [("search", "foo"), ("per_page", "20")].into_iter().collect();
        assert_eq!(params.get("search"), Some("foo"));
        assert_eq!(params.get("per_page"), Some("20"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn filled_requires_non_empty_value() {
        let params: Params = [("search_by", "title"), ("q", "")].into_iter().collect();
        assert!(params.filled("search_by"));
        assert!(!params.filled("q"));
        assert!(!params.filled("absent"));
    }

    #[test]
    fn deserializes_from_a_plain_map() {
        let params: Params = serde_json::from_str(r#"{"sort": "asc", "skip": "10"}"#).unwrap();
        assert_eq!(params.get("sort"), Some("asc"));
        assert_eq!(params.get("skip"), Some("10"));
    }
}
