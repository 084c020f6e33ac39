// crates/vault-contract-config/src/env.rs
// ============================================================================
// Module: Harness Environment
// Description: Environment-backed overrides for harness configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are read through a lookup function so callers can
//! substitute a fixed map in tests instead of mutating process state.
//! Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys recognized by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEnv {
    /// Config file path override.
    ConfigPath,
    /// API base URL override.
    BaseUrl,
    /// Request timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl ConfigEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigPath => "VAULT_CONTRACT_CONFIG",
            Self::BaseUrl => "VAULT_CONTRACT_BASE_URL",
            Self::TimeoutSeconds => "VAULT_CONTRACT_TIMEOUT_SEC",
        }
    }
}

/// Environment lookup signature: `Ok(None)` when unset.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Result<Option<String>, String>;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads a process environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn process_env(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads a variable through `lookup` and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
pub(crate) fn read_env_nonempty(
    lookup: EnvLookup<'_>,
    key: ConfigEnv,
) -> Result<Option<String>, String> {
    let name = key.as_str();
    match lookup(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a positive timeout value in whole seconds.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
