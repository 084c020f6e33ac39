// crates/vault-contract-core/src/session.rs
// ============================================================================
// Module: Session Tokens
// Description: Unverified decoding of login tokens into a signing session.
// Purpose: Turn a freshly issued token into a capability that signs requests.
// Dependencies: base64, serde, serde_json
// ============================================================================

//! ## Overview
//! The login endpoint returns a three-segment JWT. The harness reads the
//! payload claims (`user_uuid`, `signature_key`, `nonce`) without verifying
//! the token signature: it trusts a token it was just issued. The decoded
//! [`Session`] keeps the signing secret private and exposes signing as an
//! operation instead of handing the secret out.
//!
//! Security posture: decoded claims never leave this module except through
//! [`Session`], whose `Debug` redacts the token, secret, and nonce.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;

use crate::error::HarnessError;
use crate::signing;
use crate::signing::SignedRequest;

/// Expected length of a textual UUID claim.
pub const USER_UUID_LEN: usize = 36;

/// Claims the harness reads from the token payload.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct TokenClaims {
    /// User identifier.
    user_uuid: String,
    /// HMAC signing secret.
    signature_key: String,
    /// Session nonce bound into every signature.
    nonce: String,
}

impl fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenClaims")
            .field("user_uuid", &self.user_uuid)
            .field("signature_key", &"<redacted>")
            .field("nonce", &"<redacted>")
            .finish()
    }
}

impl TokenClaims {
    /// Decodes the payload segment of a JWT without verifying it.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MalformedToken`] when the token does not have
    /// three segments, the payload is not base64url JSON, or a required claim
    /// is missing, not a string, or empty.
    pub(crate) fn decode(token: &str) -> Result<Self, HarnessError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return Err(HarnessError::MalformedToken(
                "token must have exactly three segments".to_string(),
            ));
        };
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).map_err(|err| {
            HarnessError::MalformedToken(format!("payload is not base64url: {err}"))
        })?;
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|err| HarnessError::MalformedToken(format!("payload is not json: {err}")))?;
        Ok(Self {
            user_uuid: required_claim(&value, "user_uuid")?,
            signature_key: required_claim(&value, "signature_key")?,
            nonce: required_claim(&value, "nonce")?,
        })
    }
}

/// Reads a non-empty string claim.
fn required_claim(payload: &Value, name: &str) -> Result<String, HarnessError> {
    match payload.get(name) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(HarnessError::MalformedToken(format!("claim {name} is empty"))),
        Some(_) => Err(HarnessError::MalformedToken(format!("claim {name} must be a string"))),
        None => Err(HarnessError::MalformedToken(format!("missing claim {name}"))),
    }
}

/// Logged-in session scoped to one suite.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Raw bearer token.
    token: String,
    /// User identifier claim.
    user_id: String,
    /// Signing secret claim.
    signing_secret: String,
    /// Nonce claim.
    nonce: String,
}

impl Session {
    /// Decodes a session from a freshly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::MalformedToken`] when the claims cannot be read.
    pub fn from_token(token: &str) -> Result<Self, HarnessError> {
        let claims = TokenClaims::decode(token)?;
        Ok(Self {
            token: token.to_string(),
            user_id: claims.user_uuid,
            signing_secret: claims.signature_key,
            nonce: claims.nonce,
        })
    }

    /// Bearer token for the `Authorization` header.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// User identifier claim.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Signs `method path` with this session's secret and nonce.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRequest`] if the secret is rejected as
    /// an HMAC key.
    pub fn sign(&self, method: &str, path: &str) -> Result<SignedRequest, HarnessError> {
        signing::sign(&self.signing_secret, method, path, &self.nonce)
    }

    /// Signs with an explicit nonce, e.g. to build a deliberately stale request.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRequest`] if the secret is rejected as
    /// an HMAC key.
    pub fn sign_with_nonce(
        &self,
        method: &str,
        path: &str,
        nonce: &str,
    ) -> Result<SignedRequest, HarnessError> {
        signing::sign(&self.signing_secret, method, path, nonce)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("signing_secret", &"<redacted>")
            .field("nonce", &"<redacted>")
            .finish()
    }
}
