// crates/vault-contract-config/src/lib.rs
// ============================================================================
// Module: Vault Contract Config Library
// Description: Configuration model and validation for the contract harness.
// Purpose: Single source of truth for vault-contract.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `vault-contract-config` defines the harness configuration: the API under
//! test, fixture constants the assertions compare against, listing limits,
//! rate-limit probe settings, scenario timing, and logging. Loading is
//! strict and fail-closed; environment overrides are applied through an
//! injectable lookup.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::ConfigEnv;
pub use env::process_env;
