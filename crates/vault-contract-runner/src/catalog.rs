// crates/vault-contract-runner/src/catalog.rs
// ============================================================================
// Module: Suite Catalog
// Description: Built-in contract suites for the vault item API.
// Purpose: Turn configured fixtures into ordered scenario lists.
// Dependencies: vault-contract-config, vault-contract-core
// ============================================================================

//! ## Overview
//! Five suites cover the remote API: `login`, `items`, `item_detail`,
//! `item_create`, and `hmac`. Fixture values (messages, tokens, limits, the
//! new item) come from [`HarnessConfig`], so the catalog is rebuilt per run.

use serde::Serialize;
use serde_json::Value;
use vault_contract_config::HarnessConfig;
use vault_contract_core::ContractId;
use vault_contract_core::session::USER_UUID_LEN;

use crate::error::RunnerError;
use crate::scenario::AuthMode;
use crate::scenario::CredentialSource;
use crate::scenario::ExpectedValue;
use crate::scenario::Expectation;
use crate::scenario::RequestPlan;
use crate::scenario::ScenarioSpec;

/// Ordered scenarios that share one suite session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteSpec {
    /// Suite name.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Scenarios in execution order.
    pub scenarios: Vec<ScenarioSpec>,
}

/// Names of the built-in suites in execution order.
pub const SUITE_NAMES: [&str; 5] = ["login", "items", "item_detail", "item_create", "hmac"];

/// Builds every built-in suite.
#[must_use]
pub fn builtin_suites(config: &HarnessConfig) -> Vec<SuiteSpec> {
    vec![
        login_suite(config),
        items_suite(config),
        item_detail_suite(config),
        item_create_suite(config),
        hmac_suite(config),
    ]
}

/// Looks up a built-in suite by name.
#[must_use]
pub fn find_suite(config: &HarnessConfig, name: &str) -> Option<SuiteSpec> {
    builtin_suites(config).into_iter().find(|suite| suite.name == name)
}

/// Resolves suite names in the order given; an empty list selects every suite.
///
/// # Errors
///
/// Returns [`RunnerError::UnknownSuite`] for a name outside the catalog.
pub fn select_suites(config: &HarnessConfig, names: &[String]) -> Result<Vec<SuiteSpec>, RunnerError> {
    if names.is_empty() {
        return Ok(builtin_suites(config));
    }
    names
        .iter()
        .map(|name| find_suite(config, name).ok_or_else(|| RunnerError::UnknownSuite(name.clone())))
        .collect()
}

/// Builds a suite.
fn suite(name: &str, description: &str, scenarios: Vec<ScenarioSpec>) -> SuiteSpec {
    SuiteSpec {
        name: name.to_string(),
        description: description.to_string(),
        scenarios,
    }
}

/// Login success, bad request, and rate-limit boundary.
fn login_suite(config: &HarnessConfig) -> SuiteSpec {
    suite(
        "login",
        "Credential exchange and login rate limiting",
        vec![
            ScenarioSpec::new(
                "login_success",
                "fresh credentials yield a token with a 36-character user id",
                RequestPlan::Login {
                    credentials: CredentialSource::Fresh,
                },
            )
            .expect(Expectation::status(200))
            .expect(Expectation::schema(ContractId::LoginSuccess))
            .expect(Expectation::TokenUserIdLength {
                length: USER_UUID_LEN,
            }),
            ScenarioSpec::new(
                "login_empty_credentials",
                "empty username and password are rejected",
                RequestPlan::Login {
                    credentials: CredentialSource::Empty,
                },
            )
            .expect(Expectation::status(400)),
            ScenarioSpec::new(
                "login_rate_limit",
                "the attempt at the advertised ceiling is throttled",
                RequestPlan::RateLimitProbe,
            )
            .expect(Expectation::status(config.rate_limit.throttled_status)),
        ],
    )
}

/// Listing limits and listing authorization.
fn items_suite(config: &HarnessConfig) -> SuiteSpec {
    let mut scenarios: Vec<ScenarioSpec> = config
        .limits
        .accepted
        .iter()
        .map(|limit| {
            ScenarioSpec::new(
                &format!("list_items_limit_{limit}"),
                "accepted limit returns a conforming listing",
                RequestPlan::ListItems {
                    auth: AuthMode::SuiteSession,
                    limit: *limit,
                    signed: false,
                },
            )
            .expect(Expectation::status(200))
            .expect(Expectation::schema(ContractId::ItemsList))
        })
        .collect();
    let probe_limit = config.limits.detail_listing_limit;
    scenarios.extend(unauthorized_pair(
        config,
        "list_items",
        |auth| RequestPlan::ListItems {
            auth,
            limit: probe_limit,
            signed: false,
        },
    ));
    let rejected = config.limits.rejected_limit();
    scenarios.push(
        ScenarioSpec::new(
            &format!("list_items_limit_{rejected}"),
            "limit above the maximum is rejected",
            RequestPlan::ListItems {
                auth: AuthMode::SuiteSession,
                limit: rejected,
                signed: false,
            },
        )
        .expect(Expectation::status(400)),
    );
    suite("items", "Item listing limits and authorization", scenarios)
}

/// Detail of the configured item.
fn item_detail_suite(config: &HarnessConfig) -> SuiteSpec {
    let fixtures = &config.fixtures;
    let mut scenarios = vec![
        ScenarioSpec::new(
            "get_item",
            "listed item detail matches the fixture",
            RequestPlan::GetItem {
                auth: AuthMode::SuiteSession,
            },
        )
        .expect(Expectation::status(200))
        .expect(Expectation::schema(ContractId::ItemDetail))
        .expect(Expectation::FieldEquals {
            pointer: "/0/id".to_string(),
            value: ExpectedValue::SuiteItemId,
        })
        .expect(Expectation::FieldEquals {
            pointer: "/0/title".to_string(),
            value: ExpectedValue::Literal(Value::String(fixtures.item_title.clone())),
        })
        .expect(Expectation::FieldMembers {
            pointer: "/0/tags".to_string(),
            members: fixtures.item_tags.iter().cloned().map(Value::String).collect(),
        })
        .expect(Expectation::FilePathsContain {
            pointer: "/0/files".to_string(),
            segments: fixtures.file_path_segments.clone(),
        }),
    ];
    scenarios.extend(unauthorized_pair(config, "get_item", |auth| RequestPlan::GetItem {
        auth,
    }));
    suite("item_detail", "Item detail content and authorization", scenarios)
}

/// Item creation and eventual listing.
fn item_create_suite(config: &HarnessConfig) -> SuiteSpec {
    let mut scenarios = vec![
        ScenarioSpec::new(
            "create_item",
            "created item is returned and eventually listed",
            RequestPlan::CreateItem {
                auth: AuthMode::SuiteSession,
            },
        )
        .expect(Expectation::status(201))
        .expect(Expectation::schema(ContractId::ItemCreated))
        .expect(Expectation::EventuallyListed {
            item_id: config.fixtures.new_item.id.clone(),
        }),
    ];
    scenarios.extend(unauthorized_pair(config, "create_item", |auth| RequestPlan::CreateItem {
        auth,
    }));
    suite("item_create", "Item creation and eventual visibility", scenarios)
}

/// Signed listing.
fn hmac_suite(config: &HarnessConfig) -> SuiteSpec {
    suite(
        "hmac",
        "Signed requests are accepted",
        vec![
            ScenarioSpec::new(
                "list_items_signed",
                "listing with nonce and signature headers succeeds",
                RequestPlan::ListItems {
                    auth: AuthMode::SuiteSession,
                    limit: config.limits.detail_listing_limit,
                    signed: true,
                },
            )
            .expect(Expectation::status(200))
            .expect(Expectation::schema(ContractId::ItemsList)),
        ],
    )
}

/// Blank-bearer (401) and forbidden-token (403) scenarios for an endpoint.
fn unauthorized_pair(
    config: &HarnessConfig,
    prefix: &str,
    plan: impl Fn(AuthMode) -> RequestPlan,
) -> [ScenarioSpec; 2] {
    [
        ScenarioSpec::new(
            &format!("{prefix}_blank_bearer"),
            "blank bearer token is not authorized",
            plan(AuthMode::BlankBearer),
        )
        .expect(Expectation::status(401))
        .expect(Expectation::schema(ContractId::ErrorBody))
        .expect(Expectation::error_message(&config.fixtures.not_authorized_message)),
        ScenarioSpec::new(
            &format!("{prefix}_forbidden"),
            "forbidden token is refused",
            plan(AuthMode::Forbidden),
        )
        .expect(Expectation::status(403))
        .expect(Expectation::schema(ContractId::ErrorBody))
        .expect(Expectation::error_message(&config.fixtures.forbidden_message)),
    ]
}
