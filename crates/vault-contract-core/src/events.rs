// crates/vault-contract-core/src/events.rs
// ============================================================================
// Module: Harness Events
// Description: Structured JSON-lines events for requests, phases, and suites.
// Purpose: Emit redacted run logs without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Events are plain serde payloads routed through a [`HarnessEventSink`].
//! The sinks write one JSON object per line to stderr or an append-only file,
//! capture into memory for tests, or drop everything.
//!
//! Security posture: event payloads carry paths, statuses, and labels only.
//! Tokens, signing secrets, nonces, and signatures are never fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outbound HTTP request event.
#[derive(Debug, Clone, Serialize)]
pub struct HttpRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// HTTP method.
    pub method: String,
    /// Request path including query string.
    pub path: String,
    /// Authorization mode label (`bearer`, `blank_bearer`, `none`).
    pub auth: &'static str,
    /// Whether signature headers were attached.
    pub signed: bool,
    /// Response status when a response was received.
    pub status: Option<u16>,
    /// Transport error kind when no response was received.
    pub error_kind: Option<&'static str>,
    /// Round-trip duration in milliseconds.
    pub duration_ms: u64,
}

/// Inputs required to construct an HTTP request event.
pub struct HttpRequestEventParams {
    /// HTTP method.
    pub method: String,
    /// Request path including query string.
    pub path: String,
    /// Authorization mode label.
    pub auth: &'static str,
    /// Whether signature headers were attached.
    pub signed: bool,
    /// Response status when a response was received.
    pub status: Option<u16>,
    /// Transport error kind when no response was received.
    pub error_kind: Option<&'static str>,
    /// Round-trip duration in milliseconds.
    pub duration_ms: u64,
}

/// Scenario lifecycle phase event.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioPhaseEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite name.
    pub suite: String,
    /// Scenario name.
    pub scenario: String,
    /// Phase label (`arrange`, `act`, `assert`, `cleanup`).
    pub phase: &'static str,
    /// Whether the phase completed without failure.
    pub passed: bool,
    /// Failure kind label when the phase failed.
    pub error_kind: Option<&'static str>,
    /// Failure message when the phase failed.
    pub message: Option<String>,
}

/// Suite completion event.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummaryEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Suite name.
    pub suite: String,
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios that failed.
    pub failed: usize,
    /// Wall-clock suite duration in milliseconds.
    pub duration_ms: u64,
}

impl HttpRequestEvent {
    /// Creates a new request event with a consistent timestamp.
    #[must_use]
    pub fn new(params: HttpRequestEventParams) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_ms(),
            method: params.method,
            path: params.path,
            auth: params.auth,
            signed: params.signed,
            status: params.status,
            error_kind: params.error_kind,
            duration_ms: params.duration_ms,
        }
    }
}

impl ScenarioPhaseEvent {
    /// Creates a phase event; `failure` carries `(kind, message)` when the phase failed.
    #[must_use]
    pub fn new(
        suite: &str,
        scenario: &str,
        phase: &'static str,
        failure: Option<(&'static str, String)>,
    ) -> Self {
        let (error_kind, message) = match failure {
            Some((kind, message)) => (Some(kind), Some(message)),
            None => (None, None),
        };
        Self {
            event: "scenario_phase",
            timestamp_ms: now_ms(),
            suite: suite.to_string(),
            scenario: scenario.to_string(),
            phase,
            passed: error_kind.is_none(),
            error_kind,
            message,
        }
    }
}

impl SuiteSummaryEvent {
    /// Creates a suite summary event.
    #[must_use]
    pub fn new(suite: &str, passed: usize, failed: usize, duration_ms: u64) -> Self {
        Self {
            event: "suite_summary",
            timestamp_ms: now_ms(),
            suite: suite.to_string(),
            passed,
            failed,
            duration_ms,
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Event sink for harness logging.
pub trait HarnessEventSink: Send + Sync {
    /// Record an HTTP request event.
    fn record_http(&self, event: &HttpRequestEvent);
    /// Record a scenario phase event.
    fn record_phase(&self, _event: &ScenarioPhaseEvent) {}
    /// Record a suite summary event.
    fn record_suite(&self, _event: &SuiteSummaryEvent) {}
}

/// Sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl StderrEventSink {
    /// Writes one JSON line to stderr, ignoring I/O errors.
    fn write<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

impl HarnessEventSink for StderrEventSink {
    fn record_http(&self, event: &HttpRequestEvent) {
        Self::write(event);
    }

    fn record_phase(&self, event: &ScenarioPhaseEvent) {
        Self::write(event);
    }

    fn record_suite(&self, event: &SuiteSummaryEvent) {
        Self::write(event);
    }
}

/// Sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one JSON line to the file, ignoring I/O errors.
    fn write<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl HarnessEventSink for FileEventSink {
    fn record_http(&self, event: &HttpRequestEvent) {
        self.write(event);
    }

    fn record_phase(&self, event: &ScenarioPhaseEvent) {
        self.write(event);
    }

    fn record_suite(&self, event: &SuiteSummaryEvent) {
        self.write(event);
    }
}

/// Sink that keeps serialized events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Captured events in emission order.
    events: Mutex<Vec<Value>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of captured events.
    #[must_use]
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns captured events whose `event` field equals `name`.
    #[must_use]
    pub fn events_named(&self, name: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event.get("event").and_then(Value::as_str) == Some(name))
            .collect()
    }

    /// Stores one event as a JSON value.
    fn push<T: Serialize>(&self, event: &T) {
        if let Ok(value) = serde_json::to_value(event)
            && let Ok(mut events) = self.events.lock()
        {
            events.push(value);
        }
    }
}

impl HarnessEventSink for MemoryEventSink {
    fn record_http(&self, event: &HttpRequestEvent) {
        self.push(event);
    }

    fn record_phase(&self, event: &ScenarioPhaseEvent) {
        self.push(event);
    }

    fn record_suite(&self, event: &SuiteSummaryEvent) {
        self.push(event);
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl HarnessEventSink for NoopEventSink {
    fn record_http(&self, _event: &HttpRequestEvent) {}
}
