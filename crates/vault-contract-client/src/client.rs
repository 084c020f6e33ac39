// crates/vault-contract-client/src/client.rs
// ============================================================================
// Module: Vault API Client
// Description: Endpoint calls for the vault item API with transcript capture.
// Purpose: Give scenarios one call per endpoint and a redacted request log.
// Dependencies: vault-contract-core, vault-contract-config, serde
// ============================================================================

//! ## Overview
//! [`ApiClient`] sends [`ApiRequest`]s through a [`Transport`], emits an
//! `http_request` event per call, and appends a [`TranscriptEntry`]. Bodies
//! of credential-bearing requests (login) are replaced by a redaction marker
//! in both directions; tokens, nonces, and signatures never enter the
//! transcript.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use vault_contract_config::HarnessConfig;
use vault_contract_core::ApiResponse;
use vault_contract_core::Credentials;
use vault_contract_core::HarnessError;
use vault_contract_core::SignedRequest;
use vault_contract_core::events::HarnessEventSink;
use vault_contract_core::events::HttpRequestEvent;
use vault_contract_core::events::HttpRequestEventParams;
use vault_contract_core::events::NoopEventSink;

use crate::transport::ApiRequest;
use crate::transport::Authorization;
use crate::transport::HttpMethod;
use crate::transport::ReqwestTransport;
use crate::transport::Transport;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Login endpoint.
pub const LOGIN_PATH: &str = "/v1/user/login";
/// Items listing endpoint.
pub const ITEMS_PATH: &str = "/user/items";
/// Item creation endpoint.
pub const CREATE_ITEM_PATH: &str = "/user/item";
/// Marker stored in place of credential-bearing bodies.
pub const REDACTED: &str = "<redacted>";

/// Path segments of the item detail endpoint `/user/{id}/item`.
#[must_use]
pub fn item_detail_segments(item_id: &str) -> Vec<String> {
    vec!["user".to_string(), item_id.to_string(), "item".to_string()]
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded request/response exchange.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    /// Monotonic sequence number.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Path with query string.
    pub path: String,
    /// Authorization mode label.
    pub auth: &'static str,
    /// Whether signature headers were attached.
    pub signed: bool,
    /// Request body (redacted for credential-bearing calls).
    pub request: Option<Value>,
    /// Response status when a response was received.
    pub status: Option<u16>,
    /// Response body (redacted for credential-bearing calls).
    pub response: Value,
    /// Transport error message.
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Vault API client with event logging and transcript capture.
#[derive(Clone)]
pub struct ApiClient {
    /// Request transport.
    transport: Arc<dyn Transport>,
    /// Event sink for `http_request` events.
    events: Arc<dyn HarnessEventSink>,
    /// Recorded exchanges.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
    /// Next sequence number.
    sequence: Arc<AtomicU64>,
}

impl ApiClient {
    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, events: Arc<dyn HarnessEventSink>) -> Self {
        Self {
            transport,
            events,
            transcript: Arc::new(Mutex::new(Vec::new())),
            sequence: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Creates a reqwest-backed client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRequest`] when the base URL is invalid
    /// or the HTTP client cannot be built.
    pub fn from_config(
        config: &HarnessConfig,
        events: Arc<dyn HarnessEventSink>,
    ) -> Result<Self, HarnessError> {
        let base = config.api.base().map_err(|err| HarnessError::InvalidRequest(err.to_string()))?;
        let transport = ReqwestTransport::new(base, config.api.timeout())?;
        Ok(Self::new(Arc::new(transport), events))
    }

    /// Creates a client that discards events.
    #[must_use]
    pub fn quiet(transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Arc::new(NoopEventSink))
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Sends one request, exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure and
    /// [`HarnessError::InvalidRequest`] when the request cannot be built.
    pub async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let started = Instant::now();
        let result = self.transport.send(request).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let (status, error_kind) = match &result {
            Ok(response) => (Some(response.status), None),
            Err(err) => (None, Some(err.kind())),
        };
        self.events.record_http(&HttpRequestEvent::new(HttpRequestEventParams {
            method: request.method.as_str().to_string(),
            path: request.path_and_query(),
            auth: request.authorization.label(),
            signed: request.signature.is_some(),
            status,
            error_kind,
            duration_ms,
        }));
        self.record_transcript(request, &result);
        result
    }

    /// `POST /v1/user/login` with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<ApiResponse, HarnessError> {
        let body = serde_json::json!({
            "username": credentials.username,
            "password": credentials.password,
        });
        self.send(&ApiRequest::post(LOGIN_PATH, body).sensitive()).await
    }

    /// `GET /user/items?limit=N`, optionally signed.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure.
    pub async fn list_items(
        &self,
        authorization: Authorization,
        limit: u32,
        signature: Option<SignedRequest>,
    ) -> Result<ApiResponse, HarnessError> {
        let mut request =
            ApiRequest::get(ITEMS_PATH).query("limit", limit).authorization(authorization);
        if let Some(signature) = signature {
            request = request.signed(signature);
        }
        self.send(&request).await
    }

    /// `GET /user/{id}/item`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure.
    pub async fn get_item(
        &self,
        authorization: Authorization,
        item_id: &str,
    ) -> Result<ApiResponse, HarnessError> {
        let request = ApiRequest::with_segments(HttpMethod::Get, item_detail_segments(item_id))
            .authorization(authorization);
        self.send(&request).await
    }

    /// `POST /user/item` with a JSON item body.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure.
    pub async fn create_item(
        &self,
        authorization: Authorization,
        item: Value,
    ) -> Result<ApiResponse, HarnessError> {
        self.send(&ApiRequest::post(CREATE_ITEM_PATH, item).authorization(authorization)).await
    }

    /// Appends a redacted transcript entry.
    fn record_transcript(&self, request: &ApiRequest, result: &Result<ApiResponse, HarnessError>) {
        let redact = |value: Value| {
            if request.sensitive { Value::String(REDACTED.to_string()) } else { value }
        };
        let (status, response, error) = match result {
            Ok(response) => (Some(response.status), redact(response.body.clone()), None),
            Err(err) => (None, Value::Null, Some(err.to_string())),
        };
        let entry = TranscriptEntry {
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
            method: request.method.as_str().to_string(),
            path: request.path_and_query(),
            auth: request.authorization.label(),
            signed: request.signature.is_some(),
            request: request.body.clone().map(redact),
            status,
            response,
            error,
        };
        if let Ok(mut transcript) = self.transcript.lock() {
            transcript.push(entry);
        }
    }
}
