// crates/vault-contract-runner/src/report.rs
// ============================================================================
// Module: Run Reports
// Description: Scenario, suite, and run outcomes with JSON and Markdown output.
// Purpose: Give callers a pass/fail record with the evidence behind failures.
// Dependencies: serde, serde_jcs, vault-contract-core
// ============================================================================

//! ## Overview
//! Reports hold statuses, bodies of failing responses, and schema
//! diagnostics. They never carry tokens, signing secrets, or nonces: nothing
//! session-derived is copied into an outcome.

use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use vault_contract_core::Diagnostic;
use vault_contract_core::HarnessError;
use vault_contract_core::rate_limit::ProbeReport;

use crate::scenario::Phase;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioOutcome {
    /// Suite name.
    pub suite: String,
    /// Scenario name.
    pub scenario: String,
    /// True when every phase succeeded.
    pub passed: bool,
    /// Phase that failed.
    pub failed_phase: Option<Phase>,
    /// Failure messages, first failure first.
    pub errors: Vec<String>,
    /// Error kind of the first failure.
    pub error_kind: Option<&'static str>,
    /// Status of the act-phase response, when one was received.
    pub status: Option<u16>,
    /// Body of the act-phase response on failure.
    pub body: Option<Value>,
    /// Schema diagnostics from failed contract checks.
    pub diagnostics: Vec<Diagnostic>,
    /// Rate-limit probe summary for probe scenarios.
    pub probe: Option<ProbeReport>,
    /// Wall-clock duration including the settle delay.
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    /// Creates a passing outcome.
    #[must_use]
    pub fn passed(suite: &str, scenario: &str) -> Self {
        Self {
            suite: suite.to_string(),
            scenario: scenario.to_string(),
            passed: true,
            failed_phase: None,
            errors: Vec::new(),
            error_kind: None,
            status: None,
            body: None,
            diagnostics: Vec::new(),
            probe: None,
            duration_ms: 0,
        }
    }

    /// Marks the outcome failed in `phase` with every error in `errors`.
    ///
    /// Setup responses from an arrange failure stay out of `status` and `body`.
    pub fn fail(&mut self, phase: Phase, errors: &[HarnessError]) {
        let Some(first) = errors.first() else {
            return;
        };
        self.passed = false;
        self.failed_phase = Some(phase);
        self.error_kind = Some(first.kind());
        self.errors = errors.iter().map(ToString::to_string).collect();
        self.diagnostics = errors.iter().flat_map(|err| err.diagnostics().iter().cloned()).collect();
        if matches!(phase, Phase::Act | Phase::Assert)
            && self.status.is_none()
            && let Some(response) = first.response()
        {
            self.status = Some(response.status);
            self.body = Some(response.body.clone());
        }
    }

    /// First failure message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Outcomes of one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Scenario outcomes in execution order.
    pub scenarios: Vec<ScenarioOutcome>,
    /// Number of passing scenarios.
    pub passed: usize,
    /// Number of failing scenarios.
    pub failed: usize,
    /// Suite duration.
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Builds a suite report from outcomes.
    #[must_use]
    pub fn new(suite: &str, scenarios: Vec<ScenarioOutcome>, duration_ms: u64) -> Self {
        let passed = scenarios.iter().filter(|outcome| outcome.passed).count();
        Self {
            suite: suite.to_string(),
            failed: scenarios.len() - passed,
            passed,
            scenarios,
            duration_ms,
        }
    }

    /// True when every scenario passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Looks up a scenario outcome by name.
    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioOutcome> {
        self.scenarios.iter().find(|outcome| outcome.scenario == name)
    }
}

/// Outcomes of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Suite reports in execution order.
    pub suites: Vec<SuiteReport>,
    /// Passing scenarios across suites.
    pub passed: usize,
    /// Failing scenarios across suites.
    pub failed: usize,
}

impl RunReport {
    /// Aggregates suite reports.
    #[must_use]
    pub fn new(suites: Vec<SuiteReport>) -> Self {
        let passed = suites.iter().map(|suite| suite.passed).sum();
        let failed = suites.iter().map(|suite| suite.failed).sum();
        Self {
            suites,
            passed,
            failed,
        }
    }

    /// True when every scenario of every suite passed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Canonical JSON bytes of the report.
    ///
    /// # Errors
    ///
    /// Returns the serializer error message.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, String> {
        serde_jcs::to_vec(self).map_err(|err| err.to_string())
    }

    /// Markdown summary table with failure details.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# Vault Contract Run\n\n");
        let _ = writeln!(out, "- passed: {}\n- failed: {}\n", self.passed, self.failed);
        out.push_str("| suite | scenario | result | phase | status |\n");
        out.push_str("| --- | --- | --- | --- | --- |\n");
        for suite in &self.suites {
            for outcome in &suite.scenarios {
                let result = if outcome.passed { "pass" } else { "FAIL" };
                let phase = outcome.failed_phase.map_or("", Phase::as_str);
                let status = outcome.status.map(|status| status.to_string()).unwrap_or_default();
                let _ = writeln!(
                    out,
                    "| {} | {} | {result} | {phase} | {status} |",
                    outcome.suite, outcome.scenario
                );
            }
        }
        let failures: Vec<&ScenarioOutcome> = self
            .suites
            .iter()
            .flat_map(|suite| suite.scenarios.iter())
            .filter(|outcome| !outcome.passed)
            .collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for outcome in failures {
                let _ = writeln!(out, "\n### {}/{}\n", outcome.suite, outcome.scenario);
                for error in &outcome.errors {
                    let _ = writeln!(out, "- {error}");
                }
                for diagnostic in &outcome.diagnostics {
                    let _ = writeln!(out, "  - `{diagnostic}`");
                }
            }
        }
        out
    }
}
