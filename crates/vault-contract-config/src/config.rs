// crates/vault-contract-config/src/config.rs
// ============================================================================
// Module: Harness Configuration
// Description: Configuration loading and validation for the contract harness.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits,
//! then environment overrides are applied, then the result is validated.
//! Every section has defaults, so an empty file is a complete configuration.
//! The loaded value is immutable and shared by reference for the whole run.
//!
//! Path resolution: an explicit path, then `VAULT_CONTRACT_CONFIG`, then
//! `vault-contract.toml` in the working directory. Only the default path may
//! be absent, in which case defaults are used.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::env::ConfigEnv;
use crate::env::EnvLookup;
use crate::env::parse_timeout_seconds;
use crate::env::process_env;
use crate::env::read_env_nonempty;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "vault-contract.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 256 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum request timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 300_000;
/// Maximum settle or visibility wait in milliseconds.
pub(crate) const MAX_WAIT_MS: u64 = 600_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Harness configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Remote API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Fixture constants compared by assertions.
    #[serde(default)]
    pub fixtures: FixturesConfig,
    /// Listing limit settings.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Rate-limit probe settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Scenario timing settings.
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Event logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Optional directory of `<contract_id>.json` overrides.
    #[serde(default)]
    pub contracts_dir: Option<PathBuf>,
}

impl HarnessConfig {
    /// Loads configuration using the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, &process_env)
    }

    /// Loads configuration with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading, overrides, or validation fail.
    pub fn load_with_env(path: Option<&Path>, lookup: EnvLookup<'_>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, lookup)?;
        validate_path(&resolved)?;
        let mut config = if !explicit && !resolved.exists() {
            Self::default()
        } else {
            let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
            Self::parse_bytes(&bytes)?
        };
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses TOML text and validates it, without environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config = Self::parse_bytes(content.as_bytes())?;
        config.validate()?;
        Ok(config)
    }

    /// Parses UTF-8 TOML bytes within the size limit.
    fn parse_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies `VAULT_CONTRACT_BASE_URL` and `VAULT_CONTRACT_TIMEOUT_SEC`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override is malformed.
    pub fn apply_env_overrides(&mut self, lookup: EnvLookup<'_>) -> Result<(), ConfigError> {
        if let Some(base_url) =
            read_env_nonempty(lookup, ConfigEnv::BaseUrl).map_err(ConfigError::Invalid)?
        {
            self.api.base_url = base_url;
        }
        if let Some(raw) =
            read_env_nonempty(lookup, ConfigEnv::TimeoutSeconds).map_err(ConfigError::Invalid)?
        {
            let timeout = parse_timeout_seconds(ConfigEnv::TimeoutSeconds.as_str(), &raw)
                .map_err(ConfigError::Invalid)?;
            self.api.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        self.fixtures.validate()?;
        self.limits.validate()?;
        self.rate_limit.validate()?;
        self.scenario.validate()?;
        self.logging.validate()?;
        if self.scenario.visibility_listing_limit > self.limits.max_limit {
            return Err(ConfigError::Invalid(
                "scenario.visibility_listing_limit must not exceed limits.max_limit".to_string(),
            ));
        }
        if let Some(dir) = &self.contracts_dir {
            validate_path(dir)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: API
// ============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the API under test.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ApiConfig {
    /// Request timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL is not absolute http(s).
    pub fn base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|err| ConfigError::Invalid(format!("api.base_url is invalid: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(
                "api.base_url must include http:// or https://".to_string(),
            ));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::Invalid(
                "api.base_url must not carry a query or fragment".to_string(),
            ));
        }
        Ok(url)
    }

    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        self.base()?;
        if self.timeout_ms == 0 || self.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "api.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Fixture constants the assertions compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturesConfig {
    /// Error message for missing or invalid bearer tokens.
    #[serde(default = "default_not_authorized_message")]
    pub not_authorized_message: String,
    /// Error message for forbidden tokens.
    #[serde(default = "default_forbidden_message")]
    pub forbidden_message: String,
    /// Bearer token the API recognizes but forbids.
    #[serde(default = "default_forbidden_token")]
    pub forbidden_token: String,
    /// Expected title of the item resolved for detail checks.
    #[serde(default = "default_item_title")]
    pub item_title: String,
    /// Expected tags of the item resolved for detail checks.
    #[serde(default = "default_item_tags")]
    pub item_tags: Vec<String>,
    /// Index into the listing used to pick the detail item.
    #[serde(default = "default_detail_item_index")]
    pub detail_item_index: usize,
    /// Segments every file `content_path` must contain.
    #[serde(default = "default_file_path_segments")]
    pub file_path_segments: Vec<String>,
    /// Item body posted by the create scenarios.
    #[serde(default)]
    pub new_item: NewItemFixture,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            not_authorized_message: default_not_authorized_message(),
            forbidden_message: default_forbidden_message(),
            forbidden_token: default_forbidden_token(),
            item_title: default_item_title(),
            item_tags: default_item_tags(),
            detail_item_index: default_detail_item_index(),
            file_path_segments: default_file_path_segments(),
            new_item: NewItemFixture::default(),
        }
    }
}

impl FixturesConfig {
    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        require_nonempty("fixtures.not_authorized_message", &self.not_authorized_message)?;
        require_nonempty("fixtures.forbidden_message", &self.forbidden_message)?;
        require_nonempty("fixtures.forbidden_token", &self.forbidden_token)?;
        if self.forbidden_token.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "fixtures.forbidden_token must not contain whitespace".to_string(),
            ));
        }
        require_nonempty("fixtures.item_title", &self.item_title)?;
        if self.file_path_segments.iter().any(|segment| segment.is_empty()) {
            return Err(ConfigError::Invalid(
                "fixtures.file_path_segments must not contain empty entries".to_string(),
            ));
        }
        self.new_item.validate()
    }
}

/// Item posted by the create scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewItemFixture {
    /// Item identifier expected in listings after creation.
    pub id: String,
    /// Item title.
    pub title: String,
    /// Item tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// File descriptors.
    #[serde(default)]
    pub files: Vec<FileFixture>,
    /// Custom fields.
    #[serde(default)]
    pub fields: Vec<FieldFixture>,
}

impl Default for NewItemFixture {
    fn default() -> Self {
        Self {
            id: "c0a80121-7ac0-4e1c-9a3f-1d5e2b7c9f10".to_string(),
            title: "Contract harness item".to_string(),
            tags: vec!["contract-test".to_string()],
            files: vec![FileFixture {
                id: "f3b1c2d4-0001-4a5b-8c6d-7e8f9a0b1c2d".to_string(),
                name: "notes.txt".to_string(),
                size: 128,
                content_path: "vault/contract-test/files/notes.txt".to_string(),
            }],
            fields: vec![FieldFixture {
                id: "a1b2c3d4-0002-4e5f-8a9b-0c1d2e3f4a5b".to_string(),
                label: "Note".to_string(),
                field_type: "text".to_string(),
                value: Value::String("created by the contract harness".to_string()),
            }],
        }
    }
}

impl NewItemFixture {
    /// JSON request body for `POST /user/item`.
    #[must_use]
    pub fn to_body(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        require_nonempty("fixtures.new_item.id", &self.id)?;
        require_nonempty("fixtures.new_item.title", &self.title)?;
        for file in &self.files {
            require_nonempty("fixtures.new_item.files.id", &file.id)?;
            require_nonempty("fixtures.new_item.files.content_path", &file.content_path)?;
        }
        for field in &self.fields {
            require_nonempty("fixtures.new_item.fields.id", &field.id)?;
        }
        Ok(())
    }
}

/// File descriptor inside a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileFixture {
    /// File identifier.
    pub id: String,
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Storage path.
    pub content_path: String,
}

/// Custom field inside a new item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldFixture {
    /// Field identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Field type label.
    #[serde(rename = "type")]
    pub field_type: String,
    /// Field value.
    pub value: Value,
}

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Listing limit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Largest limit the API accepts.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,
    /// Limits that must be accepted.
    #[serde(default = "default_accepted_limits")]
    pub accepted: Vec<u32>,
    /// Limit used to resolve the detail item.
    #[serde(default = "default_detail_listing_limit")]
    pub detail_listing_limit: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_limit: default_max_limit(),
            accepted: default_accepted_limits(),
            detail_listing_limit: default_detail_listing_limit(),
        }
    }
}

impl LimitsConfig {
    /// First limit the API must reject.
    #[must_use]
    pub const fn rejected_limit(&self) -> u32 {
        self.max_limit.saturating_add(1)
    }

    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_limit == 0 || self.max_limit == u32::MAX {
            return Err(ConfigError::Invalid(
                "limits.max_limit must be positive and below u32::MAX".to_string(),
            ));
        }
        if self.accepted.is_empty() {
            return Err(ConfigError::Invalid("limits.accepted must not be empty".to_string()));
        }
        if let Some(limit) = self.accepted.iter().find(|limit| **limit > self.max_limit) {
            return Err(ConfigError::Invalid(format!(
                "limits.accepted entry {limit} exceeds limits.max_limit"
            )));
        }
        if self.detail_listing_limit == 0 || self.detail_listing_limit > self.max_limit {
            return Err(ConfigError::Invalid(
                "limits.detail_listing_limit must be between 1 and limits.max_limit".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Rate Limit
// ============================================================================

/// Rate-limit probe settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Header carrying the ceiling.
    #[serde(default = "default_rate_limit_header")]
    pub header: String,
    /// Status expected at the boundary.
    #[serde(default = "default_throttled_status")]
    pub throttled_status: u16,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            header: default_rate_limit_header(),
            throttled_status: default_throttled_status(),
        }
    }
}

impl RateLimitConfig {
    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        let header = self.header.trim();
        if header.is_empty()
            || !header.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-')
        {
            return Err(ConfigError::Invalid(
                "rate_limit.header must be a non-empty token of [A-Za-z0-9-]".to_string(),
            ));
        }
        if !(400 ..= 599).contains(&self.throttled_status) {
            return Err(ConfigError::Invalid(
                "rate_limit.throttled_status must be a 4xx or 5xx status".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Scenario timing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Delay after every scenario before the next one starts.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Upper bound on waiting for a created item to become listed.
    #[serde(default = "default_visibility_timeout_ms")]
    pub visibility_timeout_ms: u64,
    /// Interval between visibility polls.
    #[serde(default = "default_visibility_poll_ms")]
    pub visibility_poll_ms: u64,
    /// Limit used by visibility polls.
    #[serde(default = "default_visibility_listing_limit")]
    pub visibility_listing_limit: u32,
    /// Seed for reproducible credentials; fresh entropy when unset.
    #[serde(default)]
    pub credential_seed: Option<u64>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            visibility_timeout_ms: default_visibility_timeout_ms(),
            visibility_poll_ms: default_visibility_poll_ms(),
            visibility_listing_limit: default_visibility_listing_limit(),
            credential_seed: None,
        }
    }
}

impl ScenarioConfig {
    /// Settle delay as a duration.
    #[must_use]
    pub const fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Visibility timeout as a duration.
    #[must_use]
    pub const fn visibility_timeout(&self) -> Duration {
        Duration::from_millis(self.visibility_timeout_ms)
    }

    /// Visibility poll interval as a duration.
    #[must_use]
    pub const fn visibility_poll(&self) -> Duration {
        Duration::from_millis(self.visibility_poll_ms)
    }

    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.settle_ms > MAX_WAIT_MS || self.visibility_timeout_ms > MAX_WAIT_MS {
            return Err(ConfigError::Invalid(format!(
                "scenario waits must not exceed {MAX_WAIT_MS} ms"
            )));
        }
        if self.visibility_poll_ms == 0 {
            return Err(ConfigError::Invalid(
                "scenario.visibility_poll_ms must be greater than zero".to_string(),
            ));
        }
        if self.visibility_poll_ms > self.visibility_timeout_ms {
            return Err(ConfigError::Invalid(
                "scenario.visibility_poll_ms must not exceed scenario.visibility_timeout_ms"
                    .to_string(),
            ));
        }
        if self.visibility_listing_limit == 0 {
            return Err(ConfigError::Invalid(
                "scenario.visibility_listing_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Event sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `logging.path`.
    File,
    /// Discard events.
    None,
}

/// Event logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: LogSink,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates this section.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (LogSink::File, None) => {
                Err(ConfigError::Invalid("logging.sink = \"file\" requires logging.path".to_string()))
            }
            (LogSink::File, Some(path)) => validate_path(path),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag reports whether it was explicitly chosen.
fn resolve_path(
    path: Option<&Path>,
    lookup: EnvLookup<'_>,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) =
        read_env_nonempty(lookup, ConfigEnv::ConfigPath).map_err(ConfigError::Invalid)?
    {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates a path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("path component too long".to_string()));
        }
    }
    Ok(())
}

/// Rejects blank values.
fn require_nonempty(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{name} must be set")));
    }
    Ok(())
}

/// Default API base URL.
fn default_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

/// Default per-request timeout in milliseconds.
const fn default_timeout_ms() -> u64 {
    10_000
}

/// Default error message for 401 responses.
fn default_not_authorized_message() -> String {
    "not_authorized".to_string()
}

/// Default error message for 403 responses.
fn default_forbidden_message() -> String {
    "forbidden".to_string()
}

/// Default token the API recognizes but refuses.
fn default_forbidden_token() -> String {
    "forbidden-access-token".to_string()
}

/// Default title of the detail item.
fn default_item_title() -> String {
    "Travel documents".to_string()
}

/// Default tags of the detail item.
fn default_item_tags() -> Vec<String> {
    vec!["travel".to_string(), "identity".to_string()]
}

/// Default listing index of the detail item.
const fn default_detail_item_index() -> usize {
    1
}

/// Default substrings every file content path contains.
fn default_file_path_segments() -> Vec<String> {
    vec!["vault/".to_string(), "/files/".to_string()]
}

/// Default largest accepted listing limit.
const fn default_max_limit() -> u32 {
    500
}

/// Default listing limits expected to succeed.
fn default_accepted_limits() -> Vec<u32> {
    vec![0, 1, 10, 499, 500]
}

/// Default limit used to resolve the detail item.
const fn default_detail_listing_limit() -> u32 {
    10
}

/// Default header advertising the login ceiling.
fn default_rate_limit_header() -> String {
    "x-rate-limit".to_string()
}

/// Default status of a throttled login.
const fn default_throttled_status() -> u16 {
    429
}

/// Default post-scenario settle delay in milliseconds.
const fn default_settle_ms() -> u64 {
    500
}

/// Default created-item visibility timeout in milliseconds.
const fn default_visibility_timeout_ms() -> u64 {
    10_000
}

/// Default visibility poll interval in milliseconds.
const fn default_visibility_poll_ms() -> u64 {
    500
}

/// Default listing limit used by visibility polls.
const fn default_visibility_listing_limit() -> u32 {
    500
}
