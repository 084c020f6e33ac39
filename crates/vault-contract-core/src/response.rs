// crates/vault-contract-core/src/response.rs
// ============================================================================
// Module: API Responses
// Description: Captured HTTP response value used by assertions.
// Purpose: Keep HTTP error statuses as ordinary values, distinct from
//          transport failures.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`ApiResponse`] is the scenario result: status, parsed body, and
//! lower-cased headers. A 4xx/5xx status is still an `ApiResponse`; only a
//! transport failure becomes [`crate::HarnessError::Network`].

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

/// Captured response from the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed body: JSON when parseable, a JSON string otherwise, `null` when empty.
    pub body: Value,
    /// Response headers keyed by lower-cased name.
    pub headers: BTreeMap<String, String>,
}

impl ApiResponse {
    /// Builds a response from raw parts, normalizing header names.
    #[must_use]
    pub fn new<I, K, V>(status: u16, body: Value, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_ascii_lowercase(), value.into()))
            .collect();
        Self {
            status,
            body,
            headers,
        }
    }

    /// Parses a raw body into the value representation used for assertions.
    #[must_use]
    pub fn parse_body(bytes: &[u8]) -> Value {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Value::Null;
        }
        serde_json::from_slice(bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
    }

    /// Returns a header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns the `error` field of the first element of an error body.
    ///
    /// The remote API wraps error payloads as `[{"error": "..."}]`; a bare
    /// object is accepted as well.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        let entry = match &self.body {
            Value::Array(items) => items.first()?,
            other => other,
        };
        entry.get("error").and_then(Value::as_str)
    }

    /// Resolves a JSON pointer against the body.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }
}
