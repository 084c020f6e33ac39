// crates/vault-contract-client/src/lib.rs
// ============================================================================
// Module: Vault Contract Client Library
// Description: HTTP boundary between the harness and the vault item API.
// Purpose: Issue single, unretried requests and capture what came back.
// Dependencies: reqwest, async-trait, vault-contract-core
// ============================================================================

//! ## Overview
//! [`ApiClient`] wraps a [`Transport`] with event logging and a redacted
//! transcript. [`ReqwestTransport`] is the production transport; tests can
//! substitute their own. [`SessionProvider`] exchanges credentials for a
//! decoded [`vault_contract_core::Session`].
//!
//! Every request is sent exactly once. HTTP error statuses come back as
//! ordinary responses; only transport failures become errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod session;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::TranscriptEntry;
pub use session::SessionProvider;
pub use transport::ApiRequest;
pub use transport::Authorization;
pub use transport::HttpMethod;
pub use transport::ReqwestTransport;
pub use transport::Transport;
