// crates/vault-contract-client/src/session.rs
// ============================================================================
// Module: Session Provider
// Description: Credential-for-session exchange against the login endpoint.
// Purpose: Produce a decoded session from exactly one login round trip.
// Dependencies: vault-contract-core
// ============================================================================

//! ## Overview
//! [`SessionProvider::login`] posts credentials once. Any non-2xx status is
//! an authentication failure carrying the response; a 2xx body without a
//! decodable token is a malformed-token failure. There is no cache and no
//! retry.

use serde_json::Value;
use vault_contract_core::ApiResponse;
use vault_contract_core::Credentials;
use vault_contract_core::HarnessError;
use vault_contract_core::Session;

use crate::client::ApiClient;

/// Exchanges credentials for sessions.
#[derive(Clone)]
pub struct SessionProvider {
    /// Client used for the login call.
    client: ApiClient,
}

impl SessionProvider {
    /// Creates a provider over `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self {
            client,
        }
    }

    /// Sends the login request and returns the undecoded response.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure.
    pub async fn login_raw(&self, credentials: &Credentials) -> Result<ApiResponse, HarnessError> {
        self.client.login(credentials).await
    }

    /// Logs in and decodes the session token.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Authentication`] on a non-2xx status,
    /// [`HarnessError::MalformedToken`] when the token is absent or
    /// undecodable, and [`HarnessError::Network`] on transport failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, HarnessError> {
        let response = self.login_raw(credentials).await?;
        session_from_response(response)
    }
}

/// Decodes a session from a login response.
///
/// # Errors
///
/// Returns [`HarnessError::Authentication`] on a non-2xx status and
/// [`HarnessError::MalformedToken`] when the token is absent or undecodable.
pub fn session_from_response(response: ApiResponse) -> Result<Session, HarnessError> {
    if !response.is_success() {
        return Err(HarnessError::Authentication {
            response: Box::new(response),
        });
    }
    match response.body.get("token") {
        Some(Value::String(token)) => Session::from_token(token),
        _ => Err(HarnessError::MalformedToken("login response has no token".to_string())),
    }
}
