// crates/vault-contract-core/src/credentials.rs
// ============================================================================
// Module: Synthetic Credentials
// Description: Username/password pairs generated for login attempts.
// Purpose: Give every scenario fresh, never-persisted credentials.
// Dependencies: rand, serde
// ============================================================================

//! ## Overview
//! [`CredentialFactory`] generates synthetic credentials from a seedable RNG
//! so tests can reproduce a run. Credentials are never reused across
//! scenarios and the password never appears in `Debug` output.

use std::fmt;

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use serde::Serialize;

/// Username prefixes mixed into generated names.
const USERNAME_STEMS: &[&str] =
    &["amber", "birch", "cobalt", "delta", "ember", "fjord", "granite", "harbor", "iris", "juniper"];
/// Length of the random username suffix.
const USERNAME_SUFFIX_LEN: usize = 6;
/// Length of generated passwords.
const PASSWORD_LEN: usize = 20;

/// Username/password pair sent to the login endpoint.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Login username.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials from explicit values.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Empty username and password, rejected by the API as a bad request.
    #[must_use]
    pub fn empty() -> Self {
        Self::new("", "")
    }

    /// Returns true when both fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Generator of synthetic credentials.
pub struct CredentialFactory<R = StdRng> {
    /// Random source.
    rng: R,
}

impl CredentialFactory<StdRng> {
    /// Factory seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Factory with a fixed seed for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> CredentialFactory<R> {
    /// Factory backed by a caller-provided RNG.
    pub const fn with_rng(rng: R) -> Self {
        Self {
            rng,
        }
    }

    /// Generates a fresh non-empty credential pair.
    pub fn generate(&mut self) -> Credentials {
        let stem = USERNAME_STEMS[self.rng.gen_range(0..USERNAME_STEMS.len())];
        let suffix = self.alphanumeric(USERNAME_SUFFIX_LEN).to_ascii_lowercase();
        let password = self.alphanumeric(PASSWORD_LEN);
        Credentials::new(format!("{stem}.{suffix}"), password)
    }

    /// Draws `len` alphanumeric characters.
    fn alphanumeric(&mut self, len: usize) -> String {
        (&mut self.rng).sample_iter(&Alphanumeric).take(len).map(char::from).collect()
    }
}

impl Default for CredentialFactory<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}
