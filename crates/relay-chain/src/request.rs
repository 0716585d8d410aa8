use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Header map with case-insensitive names.
///
/// Names are stored lowercased; values are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>")]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0
            .insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&name.to_ascii_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for Headers {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// Response produced by the terminal handler of a request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// An inbound request as seen by an HTTP-style pipeline.
///
/// Handlers inspect the inbound fields; only the terminal handler fills
/// `response`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub body: Value,
    #[serde(skip)]
    pub response: Option<Response>,
}

impl Request {
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = Request::new("GET", "/").with_header("Authorization", "Bearer abc");

        assert_eq!(request.headers.get("authorization"), Some("Bearer abc"));
        assert_eq!(request.headers.get("AUTHORIZATION"), Some("Bearer abc"));
        assert!(request.headers.contains("Authorization"));
    }

    #[test]
    fn inserting_same_header_with_other_case_replaces_value() {
        let mut headers = Headers::new();
        headers.insert("X-Trace", "1");
        let previous = headers.insert("x-trace", "2");

        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-TRACE"), Some("2"));
    }

    #[test]
    fn request_deserializes_from_json_with_defaults() -> anyhow::Result<()> {
        let request: Request = serde_json::from_value(json!({
            "method": "POST",
            "path": "/orders",
            "headers": { "Content-Type": "application/json" },
            "body": { "sku": "SKU-1" }
        }))?;

        assert_eq!(request.method, "POST");
        assert_eq!(request.headers.get("content-type"), Some("application/json"));
        assert!(request.role.is_empty());
        assert_eq!(request.body["sku"], "SKU-1");
        assert!(request.response.is_none());
        Ok(())
    }
}
