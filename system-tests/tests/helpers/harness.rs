// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Harness Wiring
// Description: Builds orchestrators and persists run artifacts.
// Purpose: Share setup between stub and live suites.
// Dependencies: vault-contract-runner, vault-contract-config
// ============================================================================

use std::path::Path;
use std::time::Duration;

use vault_contract_client::TranscriptEntry;
use vault_contract_config::HarnessConfig;
use vault_contract_config::LogSink;
use vault_contract_runner::HarnessContext;
use vault_contract_runner::RunReport;
use vault_contract_runner::ScenarioOrchestrator;
use vault_contract_runner::select_suites;

use super::artifacts::TestReporter;
use super::timeouts::resolve_timeout;

/// Outcome of one harness run.
pub struct HarnessRun {
    /// Aggregated suite report.
    pub report: RunReport,
    /// Redacted request transcript.
    pub transcript: Vec<TranscriptEntry>,
}

/// Configuration pointed at a stub, tuned for quick visibility checks.
pub fn stub_config(base_url: &str) -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.api.base_url = base_url.to_string();
    config.logging.sink = LogSink::None;
    config.scenario.settle_ms = 0;
    config.scenario.visibility_poll_ms = 25;
    config.scenario.visibility_timeout_ms = 3_000;
    config
}

/// Configuration for a live target, optionally loaded from a file.
pub fn live_config(config_path: Option<&Path>, api_url: Option<&str>) -> Result<HarnessConfig, String> {
    let mut config =
        HarnessConfig::load(config_path).map_err(|err| format!("failed to load config: {err}"))?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    config.validate().map_err(|err| format!("invalid config: {err}"))?;
    Ok(config)
}

/// Runs the named suites (all when empty) under the system-test timeout.
pub async fn run_suites(config: HarnessConfig, names: &[&str]) -> Result<HarnessRun, String> {
    let names: Vec<String> = names.iter().map(|name| (*name).to_string()).collect();
    let suites = select_suites(&config, &names).map_err(|err| err.to_string())?;
    let context = HarnessContext::from_config(config).map_err(|err| err.to_string())?;
    let mut orchestrator = ScenarioOrchestrator::new(context);
    let timeout = resolve_timeout(Duration::from_secs(60))?;
    let report = tokio::time::timeout(timeout, orchestrator.run_all(&suites))
        .await
        .map_err(|_| format!("harness run exceeded {}s", timeout.as_secs()))?;
    Ok(HarnessRun {
        report,
        transcript: orchestrator.context().client().transcript(),
    })
}

/// Writes the run report and transcript; returns the artifact names.
pub fn write_run_artifacts(reporter: &TestReporter, run: &HarnessRun) -> Result<Vec<String>, String> {
    let artifacts = reporter.artifacts();
    let report = run.report.to_canonical_json()?;
    artifacts.write_bytes("run_report.json", &report).map_err(|err| err.to_string())?;
    artifacts
        .write_text("run_report.md", &run.report.to_markdown())
        .map_err(|err| err.to_string())?;
    artifacts.write_json("transcript.json", &run.transcript).map_err(|err| err.to_string())?;
    Ok(vec![
        "run_report.json".to_string(),
        "run_report.md".to_string(),
        "transcript.json".to_string(),
    ])
}
