//! Test-support utilities for rewrite flows.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::backend::{BackendError, RewriteBackend};
use super::candidate::ModelCandidate;
use super::dispatcher::Backoff;
use super::prompt::PromptPair;

/// Deterministic backend whose responses are scripted per candidate.
///
/// Candidates without a script fail with a transport error. Every call is
/// recorded so tests can assert on attempt order and count.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: HashMap<String, Result<String, BackendError>>,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<PromptPair>>,
}

impl ScriptedBackend {
    /// Creates a backend with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `candidate_id` to return `text`.
    #[must_use]
    pub fn succeed(mut self, candidate_id: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses.insert(candidate_id.into(), Ok(text.into()));
        self
    }

    /// Scripts `candidate_id` to fail with `error`.
    #[must_use]
    pub fn fail(mut self, candidate_id: impl Into<String>, error: BackendError) -> Self {
        self.responses.insert(candidate_id.into(), Err(error));
        self
    }

    /// Candidate identifiers in the order they were called.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Prompts in the order they were received.
    #[must_use]
    pub fn prompts(&self) -> Vec<PromptPair> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RewriteBackend for ScriptedBackend {
    fn complete(
        &self,
        candidate: &ModelCandidate,
        prompt: &PromptPair,
    ) -> Result<String, BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(candidate.id().to_owned());
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(prompt.clone());

        self.responses
            .get(candidate.id())
            .cloned()
            .unwrap_or_else(|| {
                Err(BackendError::Transport {
                    message: format!("no scripted response for '{}'", candidate.id()),
                })
            })
    }
}

/// Backoff that records requested delays instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingBackoff {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingBackoff {
    /// Delays requested so far.
    #[must_use]
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Backoff for RecordingBackoff {
    fn pause(&self, delay: Duration) {
        self.pauses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(delay);
    }
}
