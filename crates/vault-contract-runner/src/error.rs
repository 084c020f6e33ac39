// crates/vault-contract-runner/src/error.rs
// ============================================================================
// Module: Runner Errors
// Description: Failures raised while assembling a harness run.
// Purpose: Separate setup failures from per-scenario outcomes.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Scenario failures are recorded in reports, never returned. [`RunnerError`]
//! covers what prevents a run from starting: bad configuration, unreadable
//! contracts, an unopenable log file, or an unknown suite name.

use thiserror::Error;
use vault_contract_config::ConfigError;
use vault_contract_core::HarnessError;
use vault_contract_core::contracts::ContractError;

/// Harness setup failures.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Contract directory could not be loaded.
    #[error(transparent)]
    Contracts(#[from] ContractError),
    /// HTTP client could not be built.
    #[error(transparent)]
    Harness(#[from] HarnessError),
    /// Event log file could not be opened.
    #[error("failed to open event log {path}: {message}")]
    EventLog {
        /// Log file path.
        path: String,
        /// I/O error message.
        message: String,
    },
    /// Requested suite is not in the catalog.
    #[error("unknown suite: {0}")]
    UnknownSuite(String),
}
