// crates/vault-contract-core/src/signing.rs
// ============================================================================
// Module: Request Signing
// Description: HMAC-SHA256 signatures over a canonical request descriptor.
// Purpose: Bind a request to a session nonce with a secret never sent in clear.
// Dependencies: hmac, sha2, hex
// ============================================================================

//! ## Overview
//! The canonical message is `"{method} {path} {nonce}"` with single spaces
//! and casing preserved. The signature is the lowercase hex HMAC-SHA256 of
//! that message keyed by the session secret. Signing is a pure function.

use std::fmt;

use hmac::Hmac;
use hmac::Mac;
use serde::Serialize;
use sha2::Sha256;

use crate::error::HarnessError;

/// Header carrying the session nonce.
pub const NONCE_HEADER: &str = "X-Nonce";
/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// HMAC-SHA256 instance.
type HmacSha256 = Hmac<Sha256>;

/// Signed request descriptor.
///
/// `Debug` redacts the nonce.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct SignedRequest {
    /// HTTP method as signed.
    pub method: String,
    /// Request path as signed (no query string).
    pub path: String,
    /// Nonce bound into the signature.
    #[serde(skip)]
    pub nonce: String,
    /// Lowercase hex signature (64 characters).
    pub signature: String,
}

impl fmt::Debug for SignedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("nonce", &"<redacted>")
            .field("signature", &self.signature)
            .finish()
    }
}

impl SignedRequest {
    /// Header pairs to attach to the outgoing request.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [(NONCE_HEADER, self.nonce.as_str()), (SIGNATURE_HEADER, self.signature.as_str())]
    }
}

/// Builds the canonical signing message.
#[must_use]
pub fn canonical_message(method: &str, path: &str, nonce: &str) -> String {
    format!("{method} {path} {nonce}")
}

/// Signs a request descriptor.
///
/// # Errors
///
/// Returns [`HarnessError::InvalidRequest`] if the secret is rejected as a key.
pub fn sign(
    secret: &str,
    method: &str,
    path: &str,
    nonce: &str,
) -> Result<SignedRequest, HarnessError> {
    let mut mac = keyed(secret)?;
    mac.update(canonical_message(method, path, nonce).as_bytes());
    Ok(SignedRequest {
        method: method.to_string(),
        path: path.to_string(),
        nonce: nonce.to_string(),
        signature: hex::encode(mac.finalize().into_bytes()),
    })
}

/// Verifies a signed request against a secret in constant time.
#[must_use]
pub fn verify(secret: &str, request: &SignedRequest) -> bool {
    let Ok(expected) = hex::decode(&request.signature) else {
        return false;
    };
    let Ok(mut mac) = keyed(secret) else {
        return false;
    };
    mac.update(canonical_message(&request.method, &request.path, &request.nonce).as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Builds a keyed HMAC instance.
fn keyed(secret: &str) -> Result<HmacSha256, HarnessError> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| HarnessError::InvalidRequest(format!("invalid signing key: {err}")))
}
