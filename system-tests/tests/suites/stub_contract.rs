// system-tests/tests/suites/stub_contract.rs
// ============================================================================
// Module: Stub Contract Tests
// Description: Contract suites executed over HTTP against the stub API.
// Purpose: Cover passing runs, boundary probing, and failure attribution.
// Dependencies: vault-contract-runner, vault-contract-client
// ============================================================================

//! ## Overview
//! Each test spawns its own stub so login counters and created items never
//! leak between tests. Artifacts land under the system-test run root.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use helpers::api_stub::StubOptions;
use helpers::api_stub::spawn_api_stub;
use helpers::artifacts::TestReporter;
use helpers::harness::run_suites;
use helpers::harness::stub_config;
use helpers::harness::write_run_artifacts;
use vault_contract_client::ApiClient;
use vault_contract_client::Authorization;
use vault_contract_client::SessionProvider;
use vault_contract_client::client::ITEMS_PATH;
use vault_contract_core::CredentialFactory;
use vault_contract_core::events::NoopEventSink;
use vault_contract_runner::Phase;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn all_suites_pass_against_stub() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("all_suites_pass_against_stub")?;
    let stub = spawn_api_stub(StubOptions::default())?;
    let run = run_suites(stub_config(stub.base_url()), &[]).await?;
    let artifacts = write_run_artifacts(&reporter, &run)?;

    assert!(run.report.is_success(), "{}", run.report.to_markdown());
    assert_eq!(run.report.suites.len(), 5);
    let transcript = serde_json::to_string(&run.transcript)?;
    assert!(!transcript.contains("stub-secret"), "transcript leaked a signing secret");
    assert!(!transcript.contains("stub-nonce"), "transcript leaked a nonce");
    assert!(stub.requests().iter().any(|line| line == "POST /user/item"));

    reporter.finish("pass", vec!["every suite passed over HTTP".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn rate_limit_probe_crosses_advertised_ceiling() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("rate_limit_probe_crosses_advertised_ceiling")?;
    let stub = spawn_api_stub(StubOptions {
        ceiling: 2,
        ..StubOptions::default()
    })?;
    let run = run_suites(stub_config(stub.base_url()), &["login"]).await?;
    let artifacts = write_run_artifacts(&reporter, &run)?;

    let outcome = run.report.suites[0].scenario("login_rate_limit").ok_or("probe scenario missing")?;
    assert!(outcome.passed, "{:?}", outcome.errors);
    let probe = outcome.probe.as_ref().ok_or("probe report missing")?;
    assert_eq!(probe.ceiling, 2);
    assert_eq!(probe.attempts.len(), 3);
    assert_eq!(probe.final_status, 429);
    assert_eq!(outcome.body, None);

    reporter.finish("pass", vec!["throttled on attempt ceiling + 1".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_with_stale_nonce_is_rejected() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("listing_with_stale_nonce_is_rejected")?;
    let stub = spawn_api_stub(StubOptions::default())?;
    let config = stub_config(stub.base_url());
    let client = ApiClient::from_config(&config, Arc::new(NoopEventSink))?;
    let sessions = SessionProvider::new(client.clone());
    let session = sessions.login(&CredentialFactory::seeded(11).generate()).await?;
    let bearer = || Authorization::Bearer(session.token().to_string());

    let signed = session.sign("GET", ITEMS_PATH)?;
    let accepted = client.list_items(bearer(), 10, Some(signed)).await?;
    assert_eq!(accepted.status, 200);

    let stale = session.sign_with_nonce("GET", ITEMS_PATH, "replayed-nonce")?;
    let rejected = client.list_items(bearer(), 10, Some(stale)).await?;
    assert_eq!(rejected.status, 401);

    let mut tampered = session.sign("GET", ITEMS_PATH)?;
    tampered.signature = format!("{}00", tampered.signature);
    let rejected = client.list_items(bearer(), 10, Some(tampered)).await?;
    assert_eq!(rejected.status, 401);

    reporter.finish("pass", vec!["stale and tampered signatures refused".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unexpected_error_message_fails_in_assert_phase() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("unexpected_error_message_fails_in_assert_phase")?;
    let stub = spawn_api_stub(StubOptions {
        not_authorized_message: "unauthorized".to_string(),
        ..StubOptions::default()
    })?;
    let run = run_suites(stub_config(stub.base_url()), &["items"]).await?;
    let artifacts = write_run_artifacts(&reporter, &run)?;

    assert!(!run.report.is_success());
    let outcome =
        run.report.suites[0].scenario("list_items_blank_bearer").ok_or("scenario missing")?;
    assert_eq!(outcome.failed_phase, Some(Phase::Assert));
    assert_eq!(outcome.status, Some(401));
    assert!(outcome.body.is_some());
    let forbidden = run.report.suites[0].scenario("list_items_forbidden").ok_or("scenario missing")?;
    assert!(forbidden.passed, "{:?}", forbidden.errors);

    reporter.finish("pass", vec!["message mismatch attributed to assert".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn created_item_outside_visibility_window_fails() -> Result<(), Box<dyn Error>> {
    let mut reporter = TestReporter::new("created_item_outside_visibility_window_fails")?;
    let stub = spawn_api_stub(StubOptions {
        visibility_delay: Duration::from_secs(30),
        ..StubOptions::default()
    })?;
    let mut config = stub_config(stub.base_url());
    config.scenario.visibility_timeout_ms = 200;
    let run = run_suites(config, &["item_create"]).await?;
    let artifacts = write_run_artifacts(&reporter, &run)?;

    let outcome = run.report.suites[0].scenario("create_item").ok_or("create_item missing")?;
    assert_eq!(outcome.failed_phase, Some(Phase::Assert));
    assert_eq!(outcome.status, Some(201));

    reporter.finish("pass", vec!["visibility timeout reported".to_string()], artifacts)?;
    Ok(())
}
