// crates/vault-contract-runner/src/scenario.rs
// ============================================================================
// Module: Scenario Model
// Description: Declarative description of one contract scenario.
// Purpose: Separate what a scenario checks from how the orchestrator runs it.
// Dependencies: serde, vault-contract-core
// ============================================================================

//! ## Overview
//! A [`ScenarioSpec`] names the request under test ([`RequestPlan`]) and the
//! checks applied to its response ([`Expectation`]). Scenarios carry no
//! runtime state; sessions, item references, and credentials are supplied by
//! the orchestrator during the arrange phase.

use serde::Serialize;
use serde_json::Value;
use vault_contract_core::ContractId;

// ============================================================================
// SECTION: Phases
// ============================================================================

/// Scenario lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Credentials, session, signature, and item reference.
    Arrange,
    /// The request under test.
    Act,
    /// Status, schema, and field checks.
    Assert,
    /// Settle delay before the next scenario.
    Cleanup,
}

impl Phase {
    /// Stable label used in events and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Arrange => "arrange",
            Self::Act => "act",
            Self::Assert => "assert",
            Self::Cleanup => "cleanup",
        }
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Authorization used by the request under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Bearer token of the suite session.
    SuiteSession,
    /// `Bearer ` with an empty token.
    BlankBearer,
    /// The configured forbidden token.
    Forbidden,
    /// No authorization header.
    None,
}

impl AuthMode {
    /// True when the mode needs the suite session during arrange.
    #[must_use]
    pub const fn needs_session(self) -> bool {
        matches!(self, Self::SuiteSession)
    }
}

/// Credentials posted by a login scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// A freshly generated pair.
    Fresh,
    /// Empty username and password.
    Empty,
}

/// Request issued during the act phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "endpoint", rename_all = "snake_case")]
pub enum RequestPlan {
    /// `POST /v1/user/login`.
    Login {
        /// Credential source.
        credentials: CredentialSource,
    },
    /// `GET /user/items?limit=N`.
    ListItems {
        /// Authorization mode.
        auth: AuthMode,
        /// Listing limit.
        limit: u32,
        /// Attach `X-Nonce` / `X-Signature` from the suite session.
        signed: bool,
    },
    /// `GET /user/{id}/item` for the suite item.
    GetItem {
        /// Authorization mode.
        auth: AuthMode,
    },
    /// `POST /user/item` with the configured new item.
    CreateItem {
        /// Authorization mode.
        auth: AuthMode,
    },
    /// Repeated logins until the advertised ceiling is crossed.
    RateLimitProbe,
}

impl RequestPlan {
    /// Authorization mode of the plan, if it sends one.
    #[must_use]
    pub const fn auth(&self) -> Option<AuthMode> {
        match self {
            Self::ListItems {
                auth, ..
            }
            | Self::GetItem {
                auth,
            }
            | Self::CreateItem {
                auth,
            } => Some(*auth),
            Self::Login {
                ..
            }
            | Self::RateLimitProbe => None,
        }
    }

    /// True when the plan needs a suite session during arrange.
    #[must_use]
    pub fn needs_session(&self) -> bool {
        match self {
            Self::ListItems {
                auth,
                signed,
                ..
            } => *signed || auth.needs_session(),
            _ => self.auth().is_some_and(AuthMode::needs_session),
        }
    }

    /// True when request or response bodies carry credentials or tokens.
    #[must_use]
    pub const fn carries_credentials(&self) -> bool {
        matches!(self, Self::Login { .. } | Self::RateLimitProbe)
    }

    /// True when the plan targets the suite item.
    #[must_use]
    pub const fn needs_item(&self) -> bool {
        matches!(self, Self::GetItem { .. })
    }
}

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Expected value of a body field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ExpectedValue {
    /// A fixed JSON value.
    Literal(Value),
    /// The item id resolved for the suite.
    SuiteItemId,
}

/// Check applied to the act-phase response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "expect", rename_all = "snake_case")]
pub enum Expectation {
    /// Exact status code.
    Status {
        /// Expected status.
        status: u16,
    },
    /// Body conforms to a contract.
    Schema {
        /// Contract identifier.
        contract: ContractId,
    },
    /// `body[0].error` equals a message.
    ErrorMessage {
        /// Expected message.
        message: String,
    },
    /// The returned token's `user_uuid` claim has an exact length.
    TokenUserIdLength {
        /// Expected length.
        length: usize,
    },
    /// A JSON pointer resolves to an expected value.
    FieldEquals {
        /// JSON pointer into the body.
        pointer: String,
        /// Expected value.
        value: ExpectedValue,
    },
    /// A JSON pointer resolves to an array with the same members in any order.
    FieldMembers {
        /// JSON pointer into the body.
        pointer: String,
        /// Expected members.
        members: Vec<Value>,
    },
    /// Every `content_path` in a file array contains each segment.
    FilePathsContain {
        /// JSON pointer to the file array.
        pointer: String,
        /// Required substrings.
        segments: Vec<String>,
    },
    /// The item id appears in a listing within the visibility timeout.
    EventuallyListed {
        /// Item id to look for.
        item_id: String,
    },
}

impl Expectation {
    /// Shorthand for [`Expectation::Status`].
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self::Status {
            status,
        }
    }

    /// Shorthand for [`Expectation::Schema`].
    #[must_use]
    pub const fn schema(contract: ContractId) -> Self {
        Self::Schema {
            contract,
        }
    }

    /// Shorthand for [`Expectation::ErrorMessage`].
    #[must_use]
    pub fn error_message(message: &str) -> Self {
        Self::ErrorMessage {
            message: message.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// One scenario of a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSpec {
    /// Scenario name, unique within its suite.
    pub name: String,
    /// One-line description.
    pub description: String,
    /// Request under test.
    pub request: RequestPlan,
    /// Checks applied to the response, in order.
    pub expectations: Vec<Expectation>,
}

impl ScenarioSpec {
    /// Creates a scenario with no expectations.
    #[must_use]
    pub fn new(name: &str, description: &str, request: RequestPlan) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            request,
            expectations: Vec::new(),
        }
    }

    /// Appends an expectation.
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}
