//! Response type for the transport boundary.
//!
//! [`ApiResponse`] is the one shape every GET/POST produces, including
//! transport failures: a connection or timeout error is absorbed into a
//! synthesized `504 Gateway Timeout` response so callers always have a
//! status to inspect instead of an exception path to unwind.

use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::Value;

/// An HTTP response reduced to what the client needs: status, lowercased
/// headers, and the raw body bytes.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    /// The HTTP status code; 504 for synthesized transport failures.
    pub status: u16,
    headers: HashMap<String, String>,
    /// The raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Builds a response from a reqwest response, consuming its body.
    ///
    /// A body that cannot be read is treated as empty.
    pub(crate) async fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            );
        }
        let body = response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        Self {
            status,
            headers,
            body,
        }
    }

    /// Synthesizes a `504 Gateway Timeout` response for a transport-level
    /// failure, logging the underlying error.
    pub(crate) fn gateway_timeout(url: &str, err: &reqwest::Error) -> Self {
        tracing::error!(%url, %err, "transport failure, synthesizing 504");
        Self {
            status: 504,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Synthesizes a `200 OK` JSON response from a debug fixture.
    pub(crate) fn from_fixture(value: &Value) -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: serde_json::to_vec(value).unwrap_or_default(),
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Parses the body as JSON; `None` if it is empty or malformed.
    #[must_use]
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The body as text, lossily decoded.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_covers_2xx_only() {
        for (status, ok) in [(199, false), (200, true), (204, true), (299, true), (300, false)] {
            let response = ApiResponse {
                status,
                headers: HashMap::new(),
                body: Vec::new(),
            };
            assert_eq!(response.is_ok(), ok, "status {status}");
        }
    }

    #[test]
    fn test_json_parses_body() {
        let response = ApiResponse {
            status: 200,
            headers: HashMap::new(),
            body: br#"{"id": 1}"#.to_vec(),
        };
        assert_eq!(response.json(), Some(json!({"id": 1})));
    }

    #[test]
    fn test_json_on_empty_or_malformed_body_is_none() {
        let empty = ApiResponse {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert_eq!(empty.json(), None);
        let bad = ApiResponse {
            status: 200,
            headers: HashMap::new(),
            body: b"<html>".to_vec(),
        };
        assert_eq!(bad.json(), None);
    }

    #[test]
    fn test_fixture_response_is_200_json() {
        let response = ApiResponse::from_fixture(&json!({"ok": true}));
        assert_eq!(response.status, 200);
        assert_eq!(response.json(), Some(json!({"ok": true})));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-disposition".to_string(), "attachment".to_string());
        let response = ApiResponse {
            status: 200,
            headers,
            body: Vec::new(),
        };
        assert_eq!(response.header("Content-Disposition"), Some("attachment"));
    }
}
