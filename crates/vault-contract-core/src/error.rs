// crates/vault-contract-core/src/error.rs
// ============================================================================
// Module: Harness Errors
// Description: Failure taxonomy shared by every harness component.
// Purpose: Surface each failure as the failure of the scenario producing it.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every failure a scenario can hit is a [`HarnessError`]. Failures that were
//! caused by an HTTP response carry that response so callers can still
//! inspect it (see [`HarnessError::response`]). Transport failures are kept
//! apart as [`HarnessError::Network`].

use thiserror::Error;

use crate::response::ApiResponse;
use crate::schema::Diagnostic;

/// Harness failure taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HarnessError {
    /// Login was rejected by the remote API.
    #[error("authentication rejected with status {}", .response.status)]
    Authentication {
        /// Rejected login response.
        response: Box<ApiResponse>,
    },
    /// Session token could not be decoded into the required claims.
    #[error("malformed session token: {0}")]
    MalformedToken(String),
    /// Response body failed structural validation.
    #[error("schema violation for contract {contract}: {}", render_diagnostics(.diagnostics))]
    SchemaViolation {
        /// Contract identifier that was violated.
        contract: String,
        /// Every violation found.
        diagnostics: Vec<Diagnostic>,
    },
    /// Status code differs from the scenario expectation.
    #[error("unexpected status: expected {expected}, got {}", .response.status)]
    UnexpectedStatus {
        /// Expected status code.
        expected: u16,
        /// Response that carried the unexpected status.
        response: Box<ApiResponse>,
    },
    /// Rate-limit ceiling header was absent or non-numeric.
    #[error("missing or invalid rate limit header {header}{}", render_value(.value.as_deref()))]
    MissingRateLimitHeader {
        /// Header name that was expected.
        header: String,
        /// Raw header value when present but unparseable.
        value: Option<String>,
    },
    /// Transport-level failure (connect, timeout, body read).
    #[error("network error: {0}")]
    Network(String),
    /// Field-level expectation did not hold.
    #[error("assertion failed: {0}")]
    Assertion(String),
    /// Rate-limit probe was driven out of order.
    #[error("rate limit probe protocol error: {0}")]
    RateLimitProtocol(String),
    /// Request could not be constructed (bad URL, bad signing key).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HarnessError {
    /// Returns the HTTP response carried by this failure, if any.
    #[must_use]
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Self::Authentication {
                response,
            }
            | Self::UnexpectedStatus {
                response, ..
            } => Some(response.as_ref()),
            _ => None,
        }
    }

    /// Returns the schema diagnostics carried by this failure, if any.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::SchemaViolation {
                diagnostics, ..
            } => diagnostics,
            _ => &[],
        }
    }

    /// Stable label for event logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Authentication {
                ..
            } => "authentication",
            Self::MalformedToken(_) => "malformed_token",
            Self::SchemaViolation {
                ..
            } => "schema_violation",
            Self::UnexpectedStatus {
                ..
            } => "unexpected_status",
            Self::MissingRateLimitHeader {
                ..
            } => "missing_rate_limit_header",
            Self::Network(_) => "network",
            Self::Assertion(_) => "assertion",
            Self::RateLimitProtocol(_) => "rate_limit_protocol",
            Self::InvalidRequest(_) => "invalid_request",
        }
    }

    /// Builds an [`HarnessError::UnexpectedStatus`] from a response.
    #[must_use]
    pub fn unexpected_status(expected: u16, response: &ApiResponse) -> Self {
        Self::UnexpectedStatus {
            expected,
            response: Box::new(response.clone()),
        }
    }
}

/// Renders diagnostics as a `; `-separated list.
fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Renders an optional raw header value.
fn render_value(value: Option<&str>) -> String {
    value.map_or_else(String::new, |value| format!(" (value \"{value}\")"))
}
