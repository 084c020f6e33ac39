// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Returns the effective timeout, honoring `VAULT_CONTRACT_SYSTEM_TEST_TIMEOUT_SEC` when set.
/// The override acts as a minimum so explicitly longer timeouts are kept.
pub fn resolve_timeout(requested: Duration) -> Result<Duration, String> {
    let config = SystemTestConfig::load()?;
    Ok(config.timeout.map_or(requested, |floor| requested.max(floor)))
}
