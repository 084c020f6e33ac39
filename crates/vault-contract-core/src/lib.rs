// crates/vault-contract-core/src/lib.rs
// ============================================================================
// Module: Vault Contract Core Library
// Description: Data model and pure building blocks for the contract harness.
// Purpose: Share schemas, signing, session decoding, and probing logic.
// Dependencies: serde, serde_json, hmac, sha2, base64, rand, thiserror
// ============================================================================

//! ## Overview
//! `vault-contract-core` holds everything the harness needs that does not
//! touch the network: structural response contracts and their validator,
//! synthetic credentials, unverified session-token decoding, HMAC request
//! signing, the rate-limit probe state machine, and structured event sinks.
//!
//! Security posture: session secrets and nonces are never rendered through
//! `Debug`, events, or reports.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod contracts;
pub mod credentials;
pub mod error;
pub mod events;
pub mod rate_limit;
pub mod response;
pub mod schema;
pub mod session;
pub mod signing;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use contracts::ContractId;
pub use contracts::ContractRegistry;
pub use credentials::CredentialFactory;
pub use credentials::Credentials;
pub use error::HarnessError;
pub use events::HarnessEventSink;
pub use rate_limit::ProbeReport;
pub use rate_limit::ProbeRun;
pub use rate_limit::ProbeState;
pub use rate_limit::RateLimitProbe;
pub use response::ApiResponse;
pub use schema::Diagnostic;
pub use schema::DiagnosticKind;
pub use schema::SchemaContract;
pub use schema::Shape;
pub use schema::ValidationReport;
pub use session::Session;
pub use signing::SignedRequest;
