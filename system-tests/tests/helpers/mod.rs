// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for vault contract system-tests.
// Purpose: Provide the API stub, harness wiring, and artifact utilities.
// Dependencies: system-tests, vault-contract-runner
// ============================================================================

//! ## Overview
//! Shared helpers for vault contract system-tests. The stub API speaks real
//! HTTP on a loopback port so the reqwest transport is exercised end to end.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod api_stub;
pub mod artifacts;
pub mod harness;
pub mod timeouts;
