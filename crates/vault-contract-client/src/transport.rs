// crates/vault-contract-client/src/transport.rs
// ============================================================================
// Module: HTTP Transport
// Description: Request description and the transport seam that sends it.
// Purpose: Keep request construction testable without a live server.
// Dependencies: async-trait, reqwest, url
// ============================================================================

//! ## Overview
//! An [`ApiRequest`] describes one call: method, path segments, query,
//! authorization mode, optional JSON body, and optional signature headers.
//! A [`Transport`] turns it into an [`ApiResponse`] or a
//! [`HarnessError::Network`] failure. [`ReqwestTransport`] never retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderValue;
use serde_json::Value;
use url::Url;
use vault_contract_core::ApiResponse;
use vault_contract_core::HarnessError;
use vault_contract_core::SignedRequest;

// ============================================================================
// SECTION: Request Types
// ============================================================================

/// HTTP methods used by the vault API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
}

impl HttpMethod {
    /// Method name as sent on the wire and signed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Authorization header mode.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// `Authorization: Bearer ` with nothing after the scheme.
    BlankBearer,
    /// No `Authorization` header.
    None,
}

impl Authorization {
    /// Stable label for events and transcripts.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::BlankBearer => "blank_bearer",
            Self::None => "none",
        }
    }
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One request to the vault API.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Unencoded path segments below the base URL.
    pub segments: Vec<String>,
    /// Query parameters in order.
    pub query: Vec<(String, String)>,
    /// Authorization mode.
    pub authorization: Authorization,
    /// JSON body.
    pub body: Option<Value>,
    /// Signature headers to attach.
    pub signature: Option<SignedRequest>,
    /// Body and response carry credentials and must not be transcribed.
    pub sensitive: bool,
}

impl ApiRequest {
    /// Builds a request for `path` (e.g. `/user/items`).
    #[must_use]
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
            authorization: Authorization::None,
            body: None,
            signature: None,
            sensitive: false,
        }
    }

    /// Builds a GET request.
    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Builds a POST request with a JSON body.
    #[must_use]
    pub fn post(path: &str, body: Value) -> Self {
        let mut request = Self::new(HttpMethod::Post, path);
        request.body = Some(body);
        request
    }

    /// Builds a request from explicit path segments.
    #[must_use]
    pub fn with_segments(method: HttpMethod, segments: Vec<String>) -> Self {
        let mut request = Self::new(method, "");
        request.segments = segments;
        request
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the authorization mode.
    #[must_use]
    pub fn authorization(mut self, authorization: Authorization) -> Self {
        self.authorization = authorization;
        self
    }

    /// Attaches signature headers.
    #[must_use]
    pub fn signed(mut self, signature: SignedRequest) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Marks the body and response as credential-bearing.
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Path as signed: `/` joined segments, no query.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Path with query string for logging.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path();
        }
        let query: Vec<String> =
            self.query.iter().map(|(name, value)| format!("{name}={value}")).collect();
        format!("{}?{}", self.path(), query.join("&"))
    }

    /// Resolves the request URL below `base`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRequest`] when `base` cannot carry a path.
    pub fn url(&self, base: &Url) -> Result<Url, HarnessError> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                HarnessError::InvalidRequest(format!("base url {base} cannot be a base"))
            })?;
            segments.pop_if_empty();
            segments.extend(&self.segments);
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Sends one request and returns the captured response.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Network`] on transport failure and
    /// [`HarnessError::InvalidRequest`] when the request cannot be built.
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError>;
}

/// reqwest-backed transport.
pub struct ReqwestTransport {
    /// Base URL of the API.
    base: Url,
    /// HTTP client configured with a request timeout.
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidRequest`] when the client cannot be built.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, HarnessError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| HarnessError::InvalidRequest(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(base, client))
    }

    /// Builds a transport around an existing client.
    #[must_use]
    pub const fn with_client(base: Url, client: Client) -> Self {
        Self {
            base,
            client,
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let url = request.url(&self.base)?;
        let mut http_request = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        http_request = http_request.header(reqwest::header::ACCEPT, "application/json");
        http_request = match &request.authorization {
            Authorization::Bearer(token) => http_request.bearer_auth(token),
            Authorization::BlankBearer => {
                http_request.header(AUTHORIZATION, HeaderValue::from_static("Bearer "))
            }
            Authorization::None => http_request,
        };
        if let Some(signature) = &request.signature {
            for (name, value) in signature.headers() {
                http_request = http_request.header(name, value);
            }
        }
        if let Some(body) = &request.body {
            http_request = http_request.json(body);
        }
        let response = http_request.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response.bytes().await.map_err(network_error)?;
        Ok(ApiResponse::new(status, ApiResponse::parse_body(&bytes), headers))
    }
}

/// Maps a reqwest failure onto the network error variant.
fn network_error(err: reqwest::Error) -> HarnessError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else {
        "request"
    };
    HarnessError::Network(format!("{kind}: {err}"))
}
