// crates/vault-contract-core/src/rate_limit.rs
// ============================================================================
// Module: Rate Limit Probe
// Description: Ceiling discovery and boundary-driving state machine.
// Purpose: Observe the exact request at which the server starts throttling.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The probe reads a ceiling `C` from a response header, then issues exactly
//! `C` further attempts, one at a time. Every attempt before the last must be
//! allowed; the last must carry the throttled status.
//!
//! A ceiling of zero means nothing is allowed: the discovery response is
//! itself the first attempt and must already be throttled, and no further
//! attempts are issued.
//!
//! State machine: `Unprobed -> CeilingKnown -> Exhausted`. Transitions out of
//! order fail with [`HarnessError::RateLimitProtocol`].

use std::future::Future;

use serde::Serialize;

use crate::error::HarnessError;
use crate::response::ApiResponse;

/// Default ceiling header name.
pub const DEFAULT_CEILING_HEADER: &str = "x-rate-limit";
/// Default throttled status code.
pub const DEFAULT_THROTTLED_STATUS: u16 = 429;

/// Probe lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProbeState {
    /// Ceiling not yet observed.
    Unprobed,
    /// Ceiling known, attempts in progress.
    CeilingKnown {
        /// Discovered ceiling.
        ceiling: u32,
        /// Attempts issued so far.
        attempts_issued: u32,
    },
    /// Every attempt has been issued and classified.
    Exhausted {
        /// Discovered ceiling.
        ceiling: u32,
    },
}

impl ProbeState {
    /// Stable state label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unprobed => "unprobed",
            Self::CeilingKnown {
                ..
            } => "ceiling_known",
            Self::Exhausted {
                ..
            } => "exhausted",
        }
    }
}

/// Classification of one observed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// 1-based attempt number; 0 is the discovery response.
    pub attempt: u32,
    /// Observed status.
    pub status: u16,
    /// Whether the status was the throttled status.
    pub throttled: bool,
}

/// Summary of a completed probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    /// Header the ceiling was read from.
    pub header: String,
    /// Discovered ceiling.
    pub ceiling: u32,
    /// Every classified response, discovery first.
    pub attempts: Vec<AttemptRecord>,
    /// Status of the boundary response.
    pub final_status: u16,
}

/// Completed probe together with the response that closed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRun {
    /// Classified attempts.
    pub report: ProbeReport,
    /// Boundary response: the last attempt, or discovery when the ceiling is zero.
    pub boundary: ApiResponse,
}

/// Rate-limit probe.
#[derive(Debug, Clone)]
pub struct RateLimitProbe {
    /// Ceiling header name.
    header: String,
    /// Status expected once the ceiling is crossed.
    throttled_status: u16,
    /// Current lifecycle state.
    state: ProbeState,
    /// Classified responses.
    attempts: Vec<AttemptRecord>,
}

impl RateLimitProbe {
    /// Creates a probe reading `header` and expecting `throttled_status` at the boundary.
    #[must_use]
    pub fn new(header: &str, throttled_status: u16) -> Self {
        Self {
            header: header.to_string(),
            throttled_status,
            state: ProbeState::Unprobed,
            attempts: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ProbeState {
        self.state
    }

    /// Reads the ceiling from the discovery response.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::RateLimitProtocol`] when already probed,
    /// [`HarnessError::MissingRateLimitHeader`] when the header is absent or
    /// not a non-negative integer, [`HarnessError::UnexpectedStatus`] when a
    /// zero ceiling is advertised on an allowed response, and
    /// [`HarnessError::Assertion`] when a positive ceiling is advertised on a
    /// throttled response.
    pub fn observe_ceiling(&mut self, response: &ApiResponse) -> Result<u32, HarnessError> {
        if self.state != ProbeState::Unprobed {
            return Err(HarnessError::RateLimitProtocol("ceiling already observed".to_string()));
        }
        let raw = response.header(&self.header);
        let ceiling = raw.and_then(|value| value.trim().parse::<u32>().ok()).ok_or_else(|| {
            HarnessError::MissingRateLimitHeader {
                header: self.header.clone(),
                value: raw.map(str::to_string),
            }
        })?;
        let throttled = response.status == self.throttled_status;
        self.attempts.push(AttemptRecord {
            attempt: 0,
            status: response.status,
            throttled,
        });
        if ceiling == 0 {
            self.state = ProbeState::Exhausted {
                ceiling,
            };
            if !throttled {
                return Err(HarnessError::unexpected_status(self.throttled_status, response));
            }
            return Ok(ceiling);
        }
        if throttled {
            return Err(HarnessError::Assertion(format!(
                "discovery request throttled with ceiling {ceiling} remaining"
            )));
        }
        self.state = ProbeState::CeilingKnown {
            ceiling,
            attempts_issued: 0,
        };
        Ok(ceiling)
    }

    /// Records the response to the next attempt and classifies it.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::RateLimitProtocol`] outside `CeilingKnown`,
    /// [`HarnessError::Assertion`] when an attempt before the boundary is
    /// throttled, and [`HarnessError::UnexpectedStatus`] when the boundary
    /// attempt is not throttled.
    pub fn record_attempt(&mut self, response: &ApiResponse) -> Result<ProbeState, HarnessError> {
        let ProbeState::CeilingKnown {
            ceiling,
            attempts_issued,
        } = self.state
        else {
            return Err(HarnessError::RateLimitProtocol(format!(
                "attempt recorded in state {}",
                self.state.label()
            )));
        };
        let attempt = attempts_issued + 1;
        let throttled = response.status == self.throttled_status;
        self.attempts.push(AttemptRecord {
            attempt,
            status: response.status,
            throttled,
        });
        let boundary = attempt == ceiling;
        self.state = if boundary {
            ProbeState::Exhausted {
                ceiling,
            }
        } else {
            ProbeState::CeilingKnown {
                ceiling,
                attempts_issued: attempt,
            }
        };
        if boundary && !throttled {
            return Err(HarnessError::unexpected_status(self.throttled_status, response));
        }
        if !boundary && throttled {
            return Err(HarnessError::Assertion(format!(
                "throttled early at attempt {attempt} of {ceiling}"
            )));
        }
        Ok(self.state)
    }

    /// Observes the ceiling then issues attempts strictly one after another.
    ///
    /// `issue` receives the 1-based attempt number and is awaited to
    /// completion before the next attempt starts.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::observe_ceiling`],
    /// [`Self::record_attempt`], or `issue` (transport failures abort).
    pub async fn drive<F, Fut>(
        &mut self,
        discovery: &ApiResponse,
        mut issue: F,
    ) -> Result<ProbeRun, HarnessError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<ApiResponse, HarnessError>>,
    {
        self.observe_ceiling(discovery)?;
        let mut boundary = discovery.clone();
        while let ProbeState::CeilingKnown {
            attempts_issued, ..
        } = self.state
        {
            let response = issue(attempts_issued + 1).await?;
            self.record_attempt(&response)?;
            boundary = response;
        }
        Ok(ProbeRun {
            report: self.report()?,
            boundary,
        })
    }

    /// Summarizes an exhausted probe.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::RateLimitProtocol`] before the probe is exhausted.
    pub fn report(&self) -> Result<ProbeReport, HarnessError> {
        let ProbeState::Exhausted {
            ceiling,
        } = self.state
        else {
            return Err(HarnessError::RateLimitProtocol("probe not exhausted".to_string()));
        };
        let final_status = self.attempts.last().map_or(0, |record| record.status);
        Ok(ProbeReport {
            header: self.header.clone(),
            ceiling,
            attempts: self.attempts.clone(),
            final_status,
        })
    }
}

impl Default for RateLimitProbe {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING_HEADER, DEFAULT_THROTTLED_STATUS)
    }
}
