// crates/vault-contract-runner/tests/helpers/mod.rs
// ============================================================================
// Module: In-Memory Vault
// Description: Transport that answers like the vault API without a socket.
// Purpose: Drive the orchestrator deterministically in integration tests.
// Dependencies: async-trait, base64, vault-contract-client, vault-contract-core
// ============================================================================

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use serde_json::json;
use vault_contract_client::ApiClient;
use vault_contract_client::ApiRequest;
use vault_contract_client::Authorization;
use vault_contract_client::HttpMethod;
use vault_contract_client::Transport;
use vault_contract_config::HarnessConfig;
use vault_contract_core::ApiResponse;
use vault_contract_core::ContractRegistry;
use vault_contract_core::CredentialFactory;
use vault_contract_core::HarnessError;
use vault_contract_core::events::MemoryEventSink;
use vault_contract_core::signing;
use vault_contract_runner::HarnessContext;
use vault_contract_runner::ScenarioOrchestrator;

/// Behavior knobs for the in-memory vault.
#[derive(Clone)]
pub struct VaultBehavior {
    /// Login ceiling advertised in `x-rate-limit`.
    pub ceiling: u32,
    /// Status returned for every non-empty login, overriding the normal flow.
    pub login_status: Option<u16>,
    /// Listings served before a created item becomes visible.
    pub visibility_lag: u32,
    /// Path prefixes that fail with a network error.
    pub unreachable: Vec<String>,
    /// Title served for item details.
    pub item_title: String,
}

impl Default for VaultBehavior {
    fn default() -> Self {
        Self {
            ceiling: 3,
            login_status: None,
            visibility_lag: 1,
            unreachable: Vec::new(),
            item_title: "Travel documents".to_string(),
        }
    }
}

/// Issued session material keyed by token.
struct Issued {
    secret: String,
    nonce: String,
}

#[derive(Default)]
struct VaultState {
    logins: BTreeMap<String, u32>,
    sessions: BTreeMap<String, Issued>,
    items: Vec<String>,
    pending: Option<(String, u32)>,
    issued: u32,
    requests: Vec<String>,
}

/// In-memory vault API.
pub struct InMemoryVault {
    behavior: VaultBehavior,
    state: Mutex<VaultState>,
}

impl InMemoryVault {
    pub fn new(behavior: VaultBehavior) -> Arc<Self> {
        let state = VaultState {
            items: vec![
                "0d6f3c1e-1111-4a7b-9c2d-000000000001".to_string(),
                "0d6f3c1e-2222-4a7b-9c2d-000000000002".to_string(),
                "0d6f3c1e-3333-4a7b-9c2d-000000000003".to_string(),
            ],
            ..VaultState::default()
        };
        Arc::new(Self {
            behavior,
            state: Mutex::new(state),
        })
    }

    /// Request log as `METHOD /path?query`.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of login requests received.
    pub fn login_count(&self) -> usize {
        self.requests().iter().filter(|line| line.starts_with("POST /v1/user/login")).count()
    }

    fn login(&self, state: &mut VaultState, body: Option<&Value>) -> ApiResponse {
        let field = |name: &str| {
            body.and_then(|body| body.get(name)).and_then(Value::as_str).unwrap_or_default()
        };
        let (username, password) = (field("username").to_string(), field("password"));
        let ceiling = self.behavior.ceiling.to_string();
        let headers = [("x-rate-limit", ceiling.as_str())];
        if username.is_empty() || password.is_empty() {
            return ApiResponse::new(400, json!([{"error": "bad_request"}]), headers);
        }
        if let Some(status) = self.behavior.login_status {
            return ApiResponse::new(status, json!([{"error": "rejected"}]), headers);
        }
        let count = state.logins.entry(username).or_insert(0);
        *count += 1;
        if *count > self.behavior.ceiling {
            return ApiResponse::new(429, json!([{"error": "too_many_requests"}]), headers);
        }
        state.issued += 1;
        let secret = format!("secret-{}", state.issued);
        let nonce = format!("nonce-{}", state.issued);
        let payload = json!({
            "user_uuid": format!("7a1e2c3d-4b5f-4a6b-8c9d-{:012}", state.issued),
            "signature_key": secret,
            "nonce": nonce,
        });
        let token = format!("hdr.{}.sig", URL_SAFE_NO_PAD.encode(payload.to_string()));
        state.sessions.insert(token.clone(), Issued {
            secret,
            nonce,
        });
        ApiResponse::new(200, json!({"token": token}), headers)
    }

    fn authorize(&self, state: &VaultState, request: &ApiRequest) -> Result<(), ApiResponse> {
        let none = Vec::<(String, String)>::new();
        let Authorization::Bearer(token) = &request.authorization else {
            return Err(ApiResponse::new(401, json!([{"error": "not_authorized"}]), none));
        };
        if token == "forbidden-access-token" {
            return Err(ApiResponse::new(403, json!([{"error": "forbidden"}]), none));
        }
        let Some(issued) = state.sessions.get(token) else {
            return Err(ApiResponse::new(401, json!([{"error": "not_authorized"}]), none));
        };
        if let Some(signature) = &request.signature {
            let [(_, nonce), (_, hex)] = signature.headers();
            let Ok(expected) =
                signing::sign(&issued.secret, request.method.as_str(), &request.path(), nonce)
            else {
                return Err(ApiResponse::new(401, json!([{"error": "not_authorized"}]), none));
            };
            if nonce != issued.nonce || expected.signature != hex {
                return Err(ApiResponse::new(401, json!([{"error": "bad_signature"}]), none));
            }
        }
        Ok(())
    }

    fn item(&self, id: &str) -> Value {
        json!({
            "id": id,
            "title": self.behavior.item_title,
            "tags": ["identity", "travel"],
            "files": [{
                "id": "f-1",
                "name": "passport.pdf",
                "size": 2048,
                "content_path": format!("vault/7a1e/files/{id}/passport.pdf"),
            }],
            "fields": [],
        })
    }

    fn handle(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        let mut state = self.state.lock().unwrap();
        let line = format!("{} {}", request.method.as_str(), request.path_and_query());
        state.requests.push(line);
        let path = request.path();
        if self.behavior.unreachable.iter().any(|prefix| path.starts_with(prefix.as_str())) {
            return Err(HarnessError::Network("connect: refused".to_string()));
        }
        let none = Vec::<(String, String)>::new();
        if request.method == HttpMethod::Post && path == "/v1/user/login" {
            return Ok(self.login(&mut state, request.body.as_ref()));
        }
        if let Err(denied) = self.authorize(&state, request) {
            return Ok(denied);
        }
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let response = match (request.method, segments.as_slice()) {
            (HttpMethod::Get, ["user", "items"]) => {
                let limit = request
                    .query
                    .iter()
                    .find(|(name, _)| name == "limit")
                    .and_then(|(_, value)| value.parse::<usize>().ok())
                    .unwrap_or(10);
                if limit > 500 {
                    return Ok(ApiResponse::new(400, json!([{"error": "bad_limit"}]), none));
                }
                if let Some((id, lag)) = state.pending.take() {
                    if lag == 0 {
                        state.items.push(id);
                    } else {
                        state.pending = Some((id, lag - 1));
                    }
                }
                let items: Vec<&String> = state.items.iter().take(limit).collect();
                ApiResponse::new(200, json!([{"items": items}]), none)
            }
            (HttpMethod::Get, ["user", id, "item"]) => {
                ApiResponse::new(200, json!([self.item(id)]), none)
            }
            (HttpMethod::Post, ["user", "item"]) => {
                let body = request.body.clone().unwrap_or(Value::Null);
                let id = body.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
                state.pending = Some((id, self.behavior.visibility_lag));
                ApiResponse::new(201, json!([body]), none)
            }
            _ => ApiResponse::new(404, json!([{"error": "not_found"}]), none),
        };
        Ok(response)
    }
}

#[async_trait]
impl Transport for InMemoryVault {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, HarnessError> {
        self.handle(request)
    }
}

/// Configuration tuned for fast in-memory runs.
pub fn fast_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.scenario.settle_ms = 0;
    config.scenario.visibility_poll_ms = 5;
    config.scenario.visibility_timeout_ms = 500;
    config
}

/// Orchestrator over `vault` with a memory sink for inspection.
pub fn orchestrator(
    vault: &Arc<InMemoryVault>,
    config: HarnessConfig,
) -> (ScenarioOrchestrator, Arc<MemoryEventSink>) {
    let events = Arc::new(MemoryEventSink::new());
    let client = ApiClient::new(vault.clone(), events.clone());
    let context = HarnessContext::new(
        Arc::new(config),
        client,
        Arc::new(ContractRegistry::builtin().clone()),
        events.clone(),
    );
    (ScenarioOrchestrator::with_credentials(context, CredentialFactory::seeded(7)), events)
}
