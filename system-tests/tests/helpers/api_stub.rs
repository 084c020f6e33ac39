// system-tests/tests/helpers/api_stub.rs
// ============================================================================
// Module: Vault API Stub
// Description: In-process HTTP stub of the vault item API.
// Purpose: Exercise the contract suites end to end over real sockets.
// Dependencies: axum, base64, vault-contract-core
// ============================================================================

use std::collections::BTreeMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use serde_json::json;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use vault_contract_config::FixturesConfig;
use vault_contract_core::SignedRequest;
use vault_contract_core::signing;

/// Maximum accepted listing limit.
const MAX_LIMIT: usize = 500;

/// Stub behavior.
#[derive(Debug, Clone)]
pub struct StubOptions {
    /// Successful logins allowed per username.
    pub ceiling: u32,
    /// Delay before a created item is listed.
    pub visibility_delay: Duration,
    /// Token that is recognized but refused.
    pub forbidden_token: String,
    /// Error message for 401 responses.
    pub not_authorized_message: String,
    /// Error message for 403 responses.
    pub forbidden_message: String,
    /// Items present before any creation, in listing order.
    pub seeded_items: Vec<Value>,
}

impl StubOptions {
    /// Options whose seeded data matches the given fixtures.
    pub fn from_fixtures(fixtures: &FixturesConfig) -> Self {
        let mut seeded_items: Vec<Value> = (0..3).map(|index| seeded_item(index, "Misc")).collect();
        if let Some(item) = seeded_items.get_mut(fixtures.detail_item_index) {
            item["title"] = Value::String(fixtures.item_title.clone());
            let mut tags = fixtures.item_tags.clone();
            tags.reverse();
            item["tags"] = json!(tags);
        }
        Self {
            ceiling: 5,
            visibility_delay: Duration::from_millis(150),
            forbidden_token: fixtures.forbidden_token.clone(),
            not_authorized_message: fixtures.not_authorized_message.clone(),
            forbidden_message: fixtures.forbidden_message.clone(),
            seeded_items,
        }
    }
}

impl Default for StubOptions {
    fn default() -> Self {
        Self::from_fixtures(&FixturesConfig::default())
    }
}

fn seeded_item(index: usize, title: &str) -> Value {
    let id = format!("5e1d0c2b-7a6f-4e3d-9c8b-{index:012}");
    json!({
        "id": id,
        "title": title,
        "tags": [],
        "files": [{
            "id": format!("file-{index}"),
            "name": "scan.pdf",
            "size": 4096,
            "content_path": format!("vault/{id}/files/file-{index}"),
        }],
        "fields": [],
    })
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Session material issued at login.
#[derive(Debug, Clone)]
struct IssuedSession {
    secret: String,
    nonce: String,
}

#[derive(Default)]
struct StubInner {
    logins: BTreeMap<String, u32>,
    sessions: BTreeMap<String, IssuedSession>,
    created: Vec<(Value, Instant)>,
    issued: u64,
    requests: Vec<String>,
}

#[derive(Clone)]
struct StubState {
    options: Arc<StubOptions>,
    inner: Arc<Mutex<StubInner>>,
}

impl StubState {
    fn record(&self, line: String) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.requests.push(line);
        }
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<IssuedSession, Response> {
        let raw = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()).unwrap_or("");
        let token = raw.strip_prefix("Bearer").map_or("", str::trim);
        if token.is_empty() {
            return Err(error(StatusCode::UNAUTHORIZED, &self.options.not_authorized_message));
        }
        if token == self.options.forbidden_token {
            return Err(error(StatusCode::FORBIDDEN, &self.options.forbidden_message));
        }
        let Ok(inner) = self.inner.lock() else {
            return Err(error(StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned"));
        };
        inner
            .sessions
            .get(token)
            .cloned()
            .ok_or_else(|| error(StatusCode::UNAUTHORIZED, &self.options.not_authorized_message))
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!([{"error": message}]))).into_response()
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the vault API stub server.
pub struct ApiStubHandle {
    base_url: String,
    state: StubState,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
}

impl ApiStubHandle {
    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the login count recorded for a username.
    pub fn login_attempts(&self, username: &str) -> u32 {
        self.state
            .inner
            .lock()
            .map_or(0, |inner| inner.logins.get(username).copied().unwrap_or(0))
    }

    /// Returns captured request lines (`METHOD path`).
    pub fn requests(&self) -> Vec<String> {
        self.state.inner.lock().map_or_else(|_| Vec::new(), |inner| inner.requests.clone())
    }
}

impl Drop for ApiStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawns the stub on an ephemeral loopback port.
pub fn spawn_api_stub(options: StubOptions) -> Result<ApiStubHandle, String> {
    let listener =
        StdTcpListener::bind("127.0.0.1:0").map_err(|err| format!("api stub bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("api stub listener nonblocking failed: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("api stub local addr failed: {err}"))?;
    let state = StubState {
        options: Arc::new(options),
        inner: Arc::new(Mutex::new(StubInner::default())),
    };
    let app = Router::new()
        .route("/v1/user/login", post(login))
        .route("/user/items", get(list_items))
        .route("/user/item", post(create_item))
        .route("/user/{id}/item", get(get_item))
        .with_state(state.clone());
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });
    Ok(ApiStubHandle {
        base_url: format!("http://{addr}"),
        state,
        shutdown: Some(shutdown_tx),
        join: Some(join),
    })
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

async fn login(State(stub): State<StubState>, body: Bytes) -> Response {
    stub.record("POST /v1/user/login".to_string());
    let ceiling = stub.options.ceiling.to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let field = |name: &str| body.get(name).and_then(Value::as_str).unwrap_or("").to_string();
    let (username, password) = (field("username"), field("password"));
    let rate_header = [("x-rate-limit", ceiling)];
    if username.is_empty() || password.is_empty() {
        return (StatusCode::BAD_REQUEST, rate_header, Json(json!([{"error": "bad_request"}])))
            .into_response();
    }
    let Ok(mut inner) = stub.inner.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned");
    };
    let count = {
        let count = inner.logins.entry(username.clone()).or_insert(0);
        *count += 1;
        *count
    };
    if count > stub.options.ceiling {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            rate_header,
            Json(json!([{"error": "too_many_requests"}])),
        )
            .into_response();
    }
    inner.issued += 1;
    let serial = inner.issued;
    let session = IssuedSession {
        secret: format!("stub-secret-{serial}-{username}"),
        nonce: format!("stub-nonce-{serial}"),
    };
    let claims = json!({
        "user_uuid": format!("9b2f4e6a-1c3d-4e5f-8a7b-{serial:012x}"),
        "signature_key": session.secret,
        "nonce": session.nonce,
    });
    let token = format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode(format!("stub-{serial}")),
    );
    inner.sessions.insert(token.clone(), session);
    (StatusCode::OK, rate_header, Json(json!({"token": token, "expires_in": 3600})))
        .into_response()
}

async fn list_items(
    State(stub): State<StubState>,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    stub.record("GET /user/items".to_string());
    let session = match stub.authorize(&headers) {
        Ok(session) => session,
        Err(response) => return response,
    };
    let limit = match query.get("limit").map(|raw| raw.parse::<usize>()) {
        None => 10,
        Some(Ok(limit)) if limit <= MAX_LIMIT => limit,
        Some(_) => return error(StatusCode::BAD_REQUEST, "invalid_limit"),
    };
    let nonce = headers.get("x-nonce").and_then(|value| value.to_str().ok());
    let signature = headers.get("x-signature").and_then(|value| value.to_str().ok());
    match (nonce, signature) {
        (None, None) => {}
        (Some(nonce), Some(signature)) => {
            let request = SignedRequest {
                method: "GET".to_string(),
                path: "/user/items".to_string(),
                nonce: nonce.to_string(),
                signature: signature.to_string(),
            };
            if nonce != session.nonce || !signing::verify(&session.secret, &request) {
                return error(StatusCode::UNAUTHORIZED, "invalid_signature");
            }
        }
        _ => return error(StatusCode::UNAUTHORIZED, "invalid_signature"),
    }
    let Ok(inner) = stub.inner.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned");
    };
    let now = Instant::now();
    let ids: Vec<Value> = stub
        .options
        .seeded_items
        .iter()
        .chain(
            inner
                .created
                .iter()
                .filter(|(_, visible_at)| *visible_at <= now)
                .map(|(item, _)| item),
        )
        .filter_map(|item| item.get("id").cloned())
        .take(limit)
        .collect();
    (StatusCode::OK, Json(json!([{"items": ids}]))).into_response()
}

async fn get_item(
    State(stub): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    stub.record(format!("GET /user/{id}/item"));
    if let Err(response) = stub.authorize(&headers) {
        return response;
    }
    let Ok(inner) = stub.inner.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned");
    };
    let found = stub
        .options
        .seeded_items
        .iter()
        .chain(inner.created.iter().map(|(item, _)| item))
        .find(|item| item.get("id").and_then(Value::as_str) == Some(id.as_str()));
    match found {
        Some(item) => (StatusCode::OK, Json(json!([item]))).into_response(),
        None => error(StatusCode::NOT_FOUND, "not_found"),
    }
}

async fn create_item(State(stub): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    stub.record("POST /user/item".to_string());
    if let Err(response) = stub.authorize(&headers) {
        return response;
    }
    let item: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let has = |name: &str| item.get(name).and_then(Value::as_str).is_some_and(|v| !v.is_empty());
    if !has("id") || !has("title") {
        return error(StatusCode::BAD_REQUEST, "invalid_item");
    }
    let Ok(mut inner) = stub.inner.lock() else {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "state_poisoned");
    };
    inner.created.push((item.clone(), Instant::now() + stub.options.visibility_delay));
    (StatusCode::CREATED, Json(json!([item]))).into_response()
}
