//! Application telemetry events and sinks.
//!
//! Rewrites are best-effort across several backends, so each failed attempt
//! and each degraded-mode result is recorded as a structured event that can be
//! inspected locally without parsing log text.

use std::io;

use serde::{Deserialize, Serialize};

/// A structured telemetry event emitted by the rewrite pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    /// One backend attempt did not produce usable text.
    AttemptFailed {
        /// Candidate model identifier.
        candidate: String,
        /// One-based attempt number within the submission.
        attempt: usize,
        /// Outcome label (e.g. `transport_failure`, `rejected`).
        outcome: String,
        /// Failure detail.
        detail: String,
    },
    /// A backend candidate produced the rewrite.
    RewriteSucceeded {
        /// Candidate model identifier.
        candidate: String,
        /// Attempts made, including the successful one.
        attempts: usize,
    },
    /// The local fallback produced the rewrite.
    DegradedModeUsed {
        /// Attempts made before falling back.
        attempts: usize,
        /// Why no backend result was used.
        reason: String,
    },
}

/// A sink that can record telemetry events.
pub trait TelemetrySink: Send + Sync + std::fmt::Debug {
    /// Records a telemetry event.
    fn record(&self, event: TelemetryEvent);
}

/// Telemetry sink that drops all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetrySink;

impl TelemetrySink for NoopTelemetrySink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Records telemetry events to stderr as JSON lines (JSONL).
///
/// This is intended for local debugging and is not transmitted anywhere.
#[derive(Debug, Default)]
pub struct StderrJsonlTelemetrySink;

impl TelemetrySink for StderrJsonlTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        let Ok(serialised) = serde_json::to_string(&event) else {
            return;
        };

        let _ignored = writeln_stderr(&serialised);
    }
}

fn writeln_stderr(message: &str) -> io::Result<()> {
    use io::Write;

    let mut stderr = io::stderr().lock();
    writeln!(stderr, "{message}")
}

/// Test doubles for telemetry assertions.
#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    use std::sync::{Mutex, PoisonError};

    use super::{TelemetryEvent, TelemetrySink};

    /// Sink that keeps every recorded event in memory.
    #[derive(Debug, Default)]
    pub struct RecordingTelemetrySink {
        events: Mutex<Vec<TelemetryEvent>>,
    }

    impl RecordingTelemetrySink {
        /// Removes and returns all recorded events.
        #[must_use]
        pub fn take(&self) -> Vec<TelemetryEvent> {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .drain(..)
                .collect()
        }
    }

    impl TelemetrySink for RecordingTelemetrySink {
        fn record(&self, event: TelemetryEvent) {
            self.events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event);
        }
    }
}
