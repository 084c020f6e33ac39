// crates/vault-contract-runner/src/orchestrator.rs
// ============================================================================
// Module: Scenario Orchestrator
// Description: Arrange, act, assert, cleanup lifecycle over contract suites.
// Purpose: Run suites sequentially and turn every failure into an outcome.
// Dependencies: tokio, vault-contract-client, vault-contract-config, vault-contract-core
// ============================================================================

//! ## Overview
//! [`ScenarioOrchestrator`] runs each scenario through four phases:
//!
//! - **arrange**: generate credentials, acquire the suite session, sign, and
//!   resolve the suite item.
//! - **act**: exactly one request, or the probe sequence for rate limiting.
//! - **assert**: status first, then every remaining expectation.
//! - **cleanup**: a fixed settle delay before the next scenario.
//!
//! The suite session is acquired once, on first need, and shared by later
//! scenarios of the same suite. A failed acquisition is cached: every
//! dependent scenario reports it as its own arrange failure. Nothing is
//! retried. Suites run one after another and never share state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use vault_contract_client::ApiClient;
use vault_contract_client::Authorization;
use vault_contract_client::HttpMethod;
use vault_contract_client::SessionProvider;
use vault_contract_client::client::ITEMS_PATH;
use vault_contract_client::session::session_from_response;
use vault_contract_config::HarnessConfig;
use vault_contract_config::LogSink;
use vault_contract_config::LoggingConfig;
use vault_contract_core::ApiResponse;
use vault_contract_core::ContractRegistry;
use vault_contract_core::CredentialFactory;
use vault_contract_core::Credentials;
use vault_contract_core::HarnessError;
use vault_contract_core::HarnessEventSink;
use vault_contract_core::ProbeReport;
use vault_contract_core::RateLimitProbe;
use vault_contract_core::Session;
use vault_contract_core::SignedRequest;
use vault_contract_core::events::FileEventSink;
use vault_contract_core::events::NoopEventSink;
use vault_contract_core::events::ScenarioPhaseEvent;
use vault_contract_core::events::StderrEventSink;
use vault_contract_core::events::SuiteSummaryEvent;

use crate::catalog::SuiteSpec;
use crate::error::RunnerError;
use crate::report::RunReport;
use crate::report::ScenarioOutcome;
use crate::report::SuiteReport;
use crate::scenario::AuthMode;
use crate::scenario::CredentialSource;
use crate::scenario::ExpectedValue;
use crate::scenario::Expectation;
use crate::scenario::Phase;
use crate::scenario::RequestPlan;
use crate::scenario::ScenarioSpec;

// ============================================================================
// SECTION: Context
// ============================================================================

/// Shared, read-only collaborators of a run.
#[derive(Clone)]
pub struct HarnessContext {
    /// Fixture and timing configuration.
    config: Arc<HarnessConfig>,
    /// API client with transcript capture.
    client: ApiClient,
    /// Login wrapper over the client.
    sessions: SessionProvider,
    /// Endpoint contracts.
    contracts: Arc<ContractRegistry>,
    /// Phase and suite event sink.
    events: Arc<dyn HarnessEventSink>,
}

impl HarnessContext {
    /// Assembles a context from explicit collaborators.
    #[must_use]
    pub fn new(
        config: Arc<HarnessConfig>,
        client: ApiClient,
        contracts: Arc<ContractRegistry>,
        events: Arc<dyn HarnessEventSink>,
    ) -> Self {
        Self {
            config,
            sessions: SessionProvider::new(client.clone()),
            client,
            contracts,
            events,
        }
    }

    /// Builds the reqwest client, event sink, and contract registry from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] when the log file, contracts, or HTTP client
    /// cannot be set up.
    pub fn from_config(config: HarnessConfig) -> Result<Self, RunnerError> {
        let events = event_sink(&config.logging)?;
        let contracts = match &config.contracts_dir {
            Some(dir) => ContractRegistry::load_dir(dir)?,
            None => ContractRegistry::builtin().clone(),
        };
        let client = ApiClient::from_config(&config, Arc::clone(&events))?;
        Ok(Self::new(Arc::new(config), client, Arc::new(contracts), events))
    }

    /// Run configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// API client (and its transcript).
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Contract registry.
    #[must_use]
    pub fn contracts(&self) -> &ContractRegistry {
        &self.contracts
    }
}

/// Builds the event sink selected by `[logging]`.
///
/// # Errors
///
/// Returns [`RunnerError::EventLog`] when the log file cannot be opened.
pub fn event_sink(logging: &LoggingConfig) -> Result<Arc<dyn HarnessEventSink>, RunnerError> {
    match (logging.sink, &logging.path) {
        (LogSink::Stderr, _) => Ok(Arc::new(StderrEventSink)),
        (LogSink::None, _) => Ok(Arc::new(NoopEventSink)),
        (LogSink::File, Some(path)) => {
            let sink = FileEventSink::new(path).map_err(|err| RunnerError::EventLog {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
            Ok(Arc::new(sink))
        }
        (LogSink::File, None) => Err(RunnerError::EventLog {
            path: String::new(),
            message: "file sink requires a path".to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Suite State
// ============================================================================

/// State shared by the scenarios of one suite.
#[derive(Default)]
struct SuiteState {
    /// Suite session, or the cached acquisition failure.
    session: Option<Result<Arc<Session>, HarnessError>>,
    /// Suite item id, or the cached resolution failure.
    item_id: Option<Result<String, HarnessError>>,
}

/// Inputs prepared by the arrange phase.
struct Arranged {
    /// Credentials for login-type requests.
    credentials: Option<Credentials>,
    /// Suite session when the scenario needs one.
    session: Option<Arc<Session>>,
    /// Authorization header mode.
    authorization: Authorization,
    /// Signature headers.
    signature: Option<SignedRequest>,
    /// Suite item id.
    item_id: Option<String>,
}

impl Arranged {
    /// Credentials generated during arrange.
    fn credentials(&self) -> Result<&Credentials, HarnessError> {
        self.credentials
            .as_ref()
            .ok_or_else(|| HarnessError::InvalidRequest("no credentials arranged".to_string()))
    }
}

/// Output of the act phase.
struct ActResult {
    /// Response the expectations apply to.
    response: ApiResponse,
    /// Probe summary for rate-limit scenarios.
    probe: Option<ProbeReport>,
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Runs contract suites.
pub struct ScenarioOrchestrator {
    /// Shared collaborators.
    context: HarnessContext,
    /// Fresh credential source.
    credentials: CredentialFactory,
}

impl ScenarioOrchestrator {
    /// Creates an orchestrator; credentials are seeded from
    /// `scenario.credential_seed` when configured.
    #[must_use]
    pub fn new(context: HarnessContext) -> Self {
        let credentials = context
            .config
            .scenario
            .credential_seed
            .map_or_else(CredentialFactory::from_entropy, CredentialFactory::seeded);
        Self::with_credentials(context, credentials)
    }

    /// Creates an orchestrator with an explicit credential factory.
    #[must_use]
    pub const fn with_credentials(context: HarnessContext, credentials: CredentialFactory) -> Self {
        Self {
            context,
            credentials,
        }
    }

    /// Shared collaborators.
    #[must_use]
    pub const fn context(&self) -> &HarnessContext {
        &self.context
    }

    /// Runs suites one after another.
    pub async fn run_all(&mut self, suites: &[SuiteSpec]) -> RunReport {
        let mut reports = Vec::with_capacity(suites.len());
        for suite in suites {
            reports.push(self.run_suite(suite).await);
        }
        RunReport::new(reports)
    }

    /// Runs one suite's scenarios in order with a fresh suite state.
    pub async fn run_suite(&mut self, suite: &SuiteSpec) -> SuiteReport {
        let started = Instant::now();
        let mut state = SuiteState::default();
        let mut outcomes = Vec::with_capacity(suite.scenarios.len());
        for scenario in &suite.scenarios {
            outcomes.push(self.run_scenario(&suite.name, scenario, &mut state).await);
        }
        let report = SuiteReport::new(&suite.name, outcomes, elapsed_ms(started));
        self.context.events.record_suite(&SuiteSummaryEvent::new(
            &report.suite,
            report.passed,
            report.failed,
            report.duration_ms,
        ));
        report
    }

    /// Runs one scenario through every phase.
    async fn run_scenario(
        &mut self,
        suite: &str,
        scenario: &ScenarioSpec,
        state: &mut SuiteState,
    ) -> ScenarioOutcome {
        let started = Instant::now();
        let mut outcome = ScenarioOutcome::passed(suite, &scenario.name);
        match self.arrange(scenario, state).await {
            Ok(arranged) => {
                self.phase_event(suite, scenario, Phase::Arrange, None);
                self.act_and_assert(suite, scenario, &arranged, &mut outcome).await;
            }
            Err(err) => {
                self.phase_event(suite, scenario, Phase::Arrange, Some(&err));
                outcome.fail(Phase::Arrange, &[err]);
            }
        }
        tokio::time::sleep(self.context.config.scenario.settle()).await;
        self.phase_event(suite, scenario, Phase::Cleanup, None);
        if scenario.request.carries_credentials() {
            outcome.body = None;
        }
        outcome.duration_ms = elapsed_ms(started);
        outcome
    }

    /// Issues the request under test and evaluates expectations.
    async fn act_and_assert(
        &self,
        suite: &str,
        scenario: &ScenarioSpec,
        arranged: &Arranged,
        outcome: &mut ScenarioOutcome,
    ) {
        let act = match self.act(scenario, arranged).await {
            Ok(act) => act,
            Err(err) => {
                let phase = failed_phase_of(&err);
                if phase == Phase::Assert {
                    self.phase_event(suite, scenario, Phase::Act, None);
                }
                self.phase_event(suite, scenario, phase, Some(&err));
                outcome.fail(phase, &[err]);
                return;
            }
        };
        self.phase_event(suite, scenario, Phase::Act, None);
        outcome.status = Some(act.response.status);
        outcome.probe = act.probe;
        let failures = self.assert(scenario, arranged, &act.response).await;
        self.phase_event(suite, scenario, Phase::Assert, failures.first());
        if !failures.is_empty() {
            outcome.body = Some(act.response.body);
            outcome.fail(Phase::Assert, &failures);
        }
    }

    /// Emits a `scenario_phase` event.
    fn phase_event(
        &self,
        suite: &str,
        scenario: &ScenarioSpec,
        phase: Phase,
        failure: Option<&HarnessError>,
    ) {
        let failure = failure.map(|err| (err.kind(), err.to_string()));
        self.context.events.record_phase(&ScenarioPhaseEvent::new(
            suite,
            &scenario.name,
            phase.as_str(),
            failure,
        ));
    }

    // ------------------------------------------------------------------------
    // Arrange
    // ------------------------------------------------------------------------

    /// Prepares credentials, session, signature, and item reference.
    async fn arrange(
        &mut self,
        scenario: &ScenarioSpec,
        state: &mut SuiteState,
    ) -> Result<Arranged, HarnessError> {
        let credentials = match scenario.request {
            RequestPlan::Login {
                credentials: CredentialSource::Empty,
            } => Some(Credentials::empty()),
            RequestPlan::Login {
                credentials: CredentialSource::Fresh,
            }
            | RequestPlan::RateLimitProbe => Some(self.credentials.generate()),
            _ => None,
        };
        let needs_session = scenario.request.needs_session()
            || scenario
                .expectations
                .iter()
                .any(|expectation| matches!(expectation, Expectation::EventuallyListed { .. }));
        let session = if needs_session { Some(self.suite_session(state).await?) } else { None };
        let needs_item = scenario.request.needs_item()
            || scenario.expectations.iter().any(|expectation| {
                matches!(
                    expectation,
                    Expectation::FieldEquals {
                        value: ExpectedValue::SuiteItemId,
                        ..
                    }
                )
            });
        let item_id = if needs_item { Some(self.suite_item(state).await?) } else { None };
        let authorization = match scenario.request.auth() {
            Some(mode) => self.authorization(mode, session.as_deref())?,
            None => Authorization::None,
        };
        let signature = match (&scenario.request, &session) {
            (
                RequestPlan::ListItems {
                    signed: true, ..
                },
                Some(session),
            ) => Some(session.sign(HttpMethod::Get.as_str(), ITEMS_PATH)?),
            _ => None,
        };
        Ok(Arranged {
            credentials,
            session,
            authorization,
            signature,
            item_id,
        })
    }

    /// Returns the suite session, logging in on first use.
    async fn suite_session(&mut self, state: &mut SuiteState) -> Result<Arc<Session>, HarnessError> {
        if let Some(cached) = &state.session {
            return cached.clone();
        }
        let credentials = self.credentials.generate();
        let result = self.context.sessions.login(&credentials).await.map(Arc::new);
        state.session = Some(result.clone());
        result
    }

    /// Returns the suite item id, listing on first use.
    async fn suite_item(&mut self, state: &mut SuiteState) -> Result<String, HarnessError> {
        if let Some(cached) = &state.item_id {
            return cached.clone();
        }
        let result = self.resolve_item(state).await;
        state.item_id = Some(result.clone());
        result
    }

    /// Reads the configured item id from a listing.
    async fn resolve_item(&mut self, state: &mut SuiteState) -> Result<String, HarnessError> {
        let session = self.suite_session(state).await?;
        let limit = self.context.config.limits.detail_listing_limit;
        let index = self.context.config.fixtures.detail_item_index;
        let response = self
            .context
            .client
            .list_items(Authorization::Bearer(session.token().to_string()), limit, None)
            .await?;
        if !response.is_success() {
            return Err(HarnessError::unexpected_status(200, &response));
        }
        let pointer = format!("/0/items/{index}");
        response
            .pointer(&pointer)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| HarnessError::Assertion(format!("listing has no item id at {pointer}")))
    }

    /// Builds the authorization for a mode.
    fn authorization(
        &self,
        mode: AuthMode,
        session: Option<&Session>,
    ) -> Result<Authorization, HarnessError> {
        match mode {
            AuthMode::SuiteSession => session
                .map(|session| Authorization::Bearer(session.token().to_string()))
                .ok_or_else(|| HarnessError::InvalidRequest("suite session not arranged".to_string())),
            AuthMode::BlankBearer => Ok(Authorization::BlankBearer),
            AuthMode::Forbidden => {
                Ok(Authorization::Bearer(self.context.config.fixtures.forbidden_token.clone()))
            }
            AuthMode::None => Ok(Authorization::None),
        }
    }

    // ------------------------------------------------------------------------
    // Act
    // ------------------------------------------------------------------------

    /// Sends the request under test.
    async fn act(&self, scenario: &ScenarioSpec, arranged: &Arranged) -> Result<ActResult, HarnessError> {
        let client = &self.context.client;
        let authorization = arranged.authorization.clone();
        let response = match &scenario.request {
            RequestPlan::Login {
                ..
            } => self.context.sessions.login_raw(arranged.credentials()?).await?,
            RequestPlan::ListItems {
                limit, ..
            } => client.list_items(authorization, *limit, arranged.signature.clone()).await?,
            RequestPlan::GetItem {
                ..
            } => {
                let item_id = arranged.item_id.as_deref().ok_or_else(|| {
                    HarnessError::InvalidRequest("suite item not arranged".to_string())
                })?;
                client.get_item(authorization, item_id).await?
            }
            RequestPlan::CreateItem {
                ..
            } => {
                client.create_item(authorization, self.context.config.fixtures.new_item.to_body()).await?
            }
            RequestPlan::RateLimitProbe => return self.probe(arranged.credentials()?).await,
        };
        Ok(ActResult {
            response,
            probe: None,
        })
    }

    /// Discovers the login ceiling and drives attempts up to the boundary.
    async fn probe(&self, credentials: &Credentials) -> Result<ActResult, HarnessError> {
        let settings = &self.context.config.rate_limit;
        let discovery = self.context.sessions.login_raw(credentials).await?;
        let mut probe = RateLimitProbe::new(&settings.header, settings.throttled_status);
        let run = probe
            .drive(&discovery, |_attempt| {
                let client = self.context.client.clone();
                let credentials = credentials.clone();
                async move { client.login(&credentials).await }
            })
            .await?;
        Ok(ActResult {
            response: run.boundary,
            probe: Some(run.report),
        })
    }

    // ------------------------------------------------------------------------
    // Assert
    // ------------------------------------------------------------------------

    /// Evaluates expectations; a status mismatch stops evaluation.
    async fn assert(
        &self,
        scenario: &ScenarioSpec,
        arranged: &Arranged,
        response: &ApiResponse,
    ) -> Vec<HarnessError> {
        let mut failures = Vec::new();
        for expectation in &scenario.expectations {
            match self.check(expectation, arranged, response).await {
                Ok(()) => {}
                // A wrong status makes the remaining checks noise.
                Err(err) if matches!(expectation, Expectation::Status { .. }) => return vec![err],
                Err(err) => failures.push(err),
            }
        }
        failures
    }

    /// Evaluates one expectation.
    async fn check(
        &self,
        expectation: &Expectation,
        arranged: &Arranged,
        response: &ApiResponse,
    ) -> Result<(), HarnessError> {
        match expectation {
            Expectation::Status {
                status,
            } => {
                if response.status == *status {
                    Ok(())
                } else {
                    Err(HarnessError::unexpected_status(*status, response))
                }
            }
            Expectation::Schema {
                contract,
            } => self.context.contracts.get(*contract).enforce(&response.body),
            Expectation::ErrorMessage {
                message,
            } => match response.error_message() {
                Some(actual) if actual == message => Ok(()),
                actual => Err(HarnessError::Assertion(format!(
                    "expected error message \"{message}\", got {}",
                    actual.unwrap_or("none")
                ))),
            },
            Expectation::TokenUserIdLength {
                length,
            } => {
                let session = session_from_response(response.clone())?;
                let actual = session.user_id().chars().count();
                if actual == *length {
                    Ok(())
                } else {
                    Err(HarnessError::Assertion(format!(
                        "user id length {actual}, expected {length}"
                    )))
                }
            }
            Expectation::FieldEquals {
                pointer,
                value,
            } => {
                let expected = match value {
                    ExpectedValue::Literal(literal) => literal.clone(),
                    ExpectedValue::SuiteItemId => {
                        Value::String(arranged.item_id.clone().ok_or_else(|| {
                            HarnessError::Assertion("no suite item resolved".to_string())
                        })?)
                    }
                };
                match response.pointer(pointer) {
                    Some(actual) if *actual == expected => Ok(()),
                    actual => Err(HarnessError::Assertion(format!(
                        "{pointer}: expected {expected}, got {}",
                        render(actual)
                    ))),
                }
            }
            Expectation::FieldMembers {
                pointer,
                members,
            } => {
                let actual = response.pointer(pointer);
                let Some(items) = actual.and_then(Value::as_array) else {
                    return Err(HarnessError::Assertion(format!(
                        "{pointer}: expected an array, got {}",
                        render(actual)
                    )));
                };
                if sorted_members(items) == sorted_members(members) {
                    Ok(())
                } else {
                    Err(HarnessError::Assertion(format!(
                        "{pointer}: expected members {}, got {}",
                        Value::Array(members.clone()),
                        Value::Array(items.clone())
                    )))
                }
            }
            Expectation::FilePathsContain {
                pointer,
                segments,
            } => check_file_paths(response, pointer, segments),
            Expectation::EventuallyListed {
                item_id,
            } => {
                let session = arranged.session.as_deref().ok_or_else(|| {
                    HarnessError::InvalidRequest("suite session not arranged".to_string())
                })?;
                self.wait_until_listed(session, item_id).await
            }
        }
    }

    /// Polls the listing until `item_id` appears or the visibility timeout passes.
    async fn wait_until_listed(&self, session: &Session, item_id: &str) -> Result<(), HarnessError> {
        let settings = &self.context.config.scenario;
        let deadline = tokio::time::Instant::now() + settings.visibility_timeout();
        loop {
            let response = self
                .context
                .client
                .list_items(
                    Authorization::Bearer(session.token().to_string()),
                    settings.visibility_listing_limit,
                    None,
                )
                .await?;
            if response.is_success() && listing_contains(&response.body, item_id) {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(HarnessError::Assertion(format!(
                    "item {item_id} not listed within {} ms",
                    settings.visibility_timeout_ms
                )));
            }
            tokio::time::sleep(settings.visibility_poll()).await;
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Transport and request-construction failures belong to act; the rest to assert.
const fn failed_phase_of(err: &HarnessError) -> Phase {
    match err {
        HarnessError::Network(_) | HarnessError::InvalidRequest(_) => Phase::Act,
        _ => Phase::Assert,
    }
}

/// Checks that every file `content_path` contains each segment.
fn check_file_paths(
    response: &ApiResponse,
    pointer: &str,
    segments: &[String],
) -> Result<(), HarnessError> {
    let files = response.pointer(pointer).and_then(Value::as_array).ok_or_else(|| {
        HarnessError::Assertion(format!("{pointer}: expected an array of files"))
    })?;
    if files.is_empty() {
        return Err(HarnessError::Assertion(format!("{pointer}: no files to check")));
    }
    for (index, file) in files.iter().enumerate() {
        let path = file.get("content_path").and_then(Value::as_str).ok_or_else(|| {
            HarnessError::Assertion(format!("{pointer}/{index}/content_path missing"))
        })?;
        if let Some(segment) = segments.iter().find(|segment| !path.contains(segment.as_str())) {
            return Err(HarnessError::Assertion(format!(
                "{pointer}/{index}/content_path {path} lacks segment {segment}"
            )));
        }
    }
    Ok(())
}

/// True when any listing page has `item_id` among its items.
fn listing_contains(body: &Value, item_id: &str) -> bool {
    body.as_array().is_some_and(|pages| {
        pages.iter().any(|page| {
            page.get("items")
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(item_id)))
        })
    })
}

/// Canonical, order-insensitive rendering of array members.
fn sorted_members(values: &[Value]) -> Vec<String> {
    let mut rendered: Vec<String> = values.iter().map(Value::to_string).collect();
    rendered.sort_unstable();
    rendered
}

/// Renders an optional value for messages.
fn render(value: Option<&Value>) -> String {
    value.map_or_else(|| "nothing".to_string(), Value::to_string)
}

/// Milliseconds since `started`, saturating.
fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
