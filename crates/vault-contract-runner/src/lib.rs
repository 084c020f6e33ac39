// crates/vault-contract-runner/src/lib.rs
// ============================================================================
// Module: Vault Contract Runner Library
// Description: Scenario model, suite catalog, orchestration, and reports.
// Purpose: Run contract suites against the vault API and summarize outcomes.
// Dependencies: tokio, serde, serde_jcs, vault-contract-client, vault-contract-core
// ============================================================================

//! ## Overview
//! [`ScenarioOrchestrator`] runs [`SuiteSpec`]s built by [`builtin_suites`]
//! and returns a [`RunReport`]. A scenario failure is an outcome, never an
//! error; [`RunnerError`] is reserved for setup problems.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod catalog;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod scenario;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::SuiteSpec;
pub use catalog::builtin_suites;
pub use catalog::find_suite;
pub use catalog::select_suites;
pub use error::RunnerError;
pub use orchestrator::HarnessContext;
pub use orchestrator::ScenarioOrchestrator;
pub use report::RunReport;
pub use report::ScenarioOutcome;
pub use report::SuiteReport;
pub use scenario::Expectation;
pub use scenario::Phase;
pub use scenario::RequestPlan;
pub use scenario::ScenarioSpec;
