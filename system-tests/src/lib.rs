// system-tests/src/lib.rs
// ============================================================================
// Module: Vault Contract System Tests Library
// Description: Shared configuration for end-to-end contract runs.
// Purpose: Provide environment settings used by the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`: where artifacts go, which live API to target, and
//! timeout floors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
