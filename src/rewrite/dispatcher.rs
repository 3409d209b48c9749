//! Ordered fallback across backend candidates.
//!
//! Candidates are tried strictly in list order. The first attempt that
//! returns non-empty text wins; every other outcome is recorded and the next
//! candidate is tried after the backoff delay. Per-attempt failures are values,
//! so one backend outage cannot abort the submission while candidates remain.

use std::fmt;
use std::thread;
use std::time::Duration;

use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::backend::{AttemptOutcome, RewriteBackend};
use super::candidate::CandidateList;
use super::prompt::PromptPair;

/// Delay between a failed attempt and the next candidate when none is
/// configured.
pub const DEFAULT_BACKOFF_DELAY: Duration = Duration::from_secs(1);

/// Waits between candidate attempts.
pub trait Backoff: Send + Sync + fmt::Debug {
    /// Blocks for `delay`.
    fn pause(&self, delay: Duration);
}

/// Backoff that blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleepBackoff;

impl Backoff for ThreadSleepBackoff {
    fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}

/// Outcome of one attempt against one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// Candidate model identifier.
    pub candidate_id: String,
    /// Classified outcome.
    pub outcome: AttemptOutcome,
}

/// Text accepted from the winning candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchWinner {
    /// Candidate model identifier.
    pub candidate_id: String,
    /// Trimmed assistant text.
    pub text: String,
}

/// Everything that happened during one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchReport {
    attempts: Vec<AttemptRecord>,
    winner: Option<DispatchWinner>,
}

impl DispatchReport {
    /// Attempts in the order they were made.
    #[must_use]
    pub fn attempts(&self) -> &[AttemptRecord] {
        self.attempts.as_slice()
    }

    /// Number of attempts made.
    #[must_use]
    pub const fn attempt_count(&self) -> usize {
        self.attempts.len()
    }

    /// Winning candidate, or `None` when every candidate failed.
    #[must_use]
    pub const fn winner(&self) -> Option<&DispatchWinner> {
        self.winner.as_ref()
    }
}

/// Tries a prompt against candidates in order until one produces text.
#[derive(Debug, Clone, Copy)]
pub struct FallbackDispatcher<'a> {
    backend: &'a dyn RewriteBackend,
    backoff: &'a dyn Backoff,
    delay: Duration,
    telemetry: &'a dyn TelemetrySink,
}

impl<'a> FallbackDispatcher<'a> {
    /// Creates a dispatcher over `backend`.
    #[must_use]
    pub const fn new(
        backend: &'a dyn RewriteBackend,
        backoff: &'a dyn Backoff,
        delay: Duration,
        telemetry: &'a dyn TelemetrySink,
    ) -> Self {
        Self {
            backend,
            backoff,
            delay,
            telemetry,
        }
    }

    /// Dispatches `prompt` across `candidates`.
    ///
    /// Never fails: exhaustion is reported as a [`DispatchReport`] without a
    /// winner.
    #[must_use]
    pub fn dispatch(&self, prompt: &PromptPair, candidates: &CandidateList) -> DispatchReport {
        let mut report = DispatchReport::default();
        let total = candidates.len();

        for (index, candidate) in candidates.iter().enumerate() {
            let attempt = index + 1;
            tracing::debug!(
                candidate = candidate.id(),
                attempt,
                total,
                "sending rewrite request"
            );

            let outcome = AttemptOutcome::classify(self.backend.complete(candidate, prompt));

            if let AttemptOutcome::Text(text) = &outcome {
                tracing::info!(candidate = candidate.id(), attempt, "rewrite candidate succeeded");
                report.winner = Some(DispatchWinner {
                    candidate_id: candidate.id().to_owned(),
                    text: text.clone(),
                });
                report.attempts.push(AttemptRecord {
                    candidate_id: candidate.id().to_owned(),
                    outcome,
                });
                return report;
            }

            tracing::warn!(
                candidate = candidate.id(),
                attempt,
                outcome = outcome.label(),
                quota = outcome.is_quota_rejection(),
                "rewrite attempt failed: {}",
                outcome.detail()
            );
            self.telemetry.record(TelemetryEvent::AttemptFailed {
                candidate: candidate.id().to_owned(),
                attempt,
                outcome: outcome.label().to_owned(),
                detail: outcome.detail().to_owned(),
            });
            report.attempts.push(AttemptRecord {
                candidate_id: candidate.id().to_owned(),
                outcome,
            });

            if attempt < total {
                self.backoff.pause(self.delay);
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
