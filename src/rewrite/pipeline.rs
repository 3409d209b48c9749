//! Orchestrates prompt building, fallback dispatch and degraded mode.

use std::sync::Arc;
use std::time::Duration;

use crate::config::TactfulConfig;
use crate::error::RewriteError;
use crate::telemetry::{
    NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
};

use super::backend::RewriteBackend;
use super::candidate::CandidateList;
use super::chat_completions::{ChatCompletionsBackend, ChatCompletionsConfig};
use super::dispatcher::{Backoff, DEFAULT_BACKOFF_DELAY, FallbackDispatcher, ThreadSleepBackoff};
use super::fallback::enhance_locally;
use super::model::{RewriteRequest, RewriteResult};
use super::prompt::build_prompt;

/// Rewrite pipeline shared by CLI adapters.
///
/// Holds only read-only configuration, so one pipeline can serve any number
/// of independent submissions.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    candidates: CandidateList,
    backend: Option<Arc<dyn RewriteBackend>>,
    backoff: Arc<dyn Backoff>,
    backoff_delay: Duration,
    telemetry: Arc<dyn TelemetrySink>,
}

impl RewritePipeline {
    /// Creates a pipeline without a backend.
    ///
    /// Until [`Self::with_backend`] is called every rewrite uses degraded
    /// mode.
    #[must_use]
    pub fn new(candidates: CandidateList) -> Self {
        Self {
            candidates,
            backend: None,
            backoff: Arc::new(ThreadSleepBackoff),
            backoff_delay: DEFAULT_BACKOFF_DELAY,
            telemetry: Arc::new(NoopTelemetrySink),
        }
    }

    /// Builds the production pipeline described by `config`.
    ///
    /// A chat completions backend is attached only when an API key
    /// resolves; otherwise the pipeline runs in degraded mode.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the candidate list or
    /// the backend endpoint is invalid.
    pub fn from_config(config: &TactfulConfig) -> Result<Self, RewriteError> {
        let mut pipeline = Self::new(config.candidate_list()?)
            .with_backoff_delay(config.backoff_delay());

        if config.telemetry {
            pipeline = pipeline.with_telemetry(Arc::new(StderrJsonlTelemetrySink));
        }

        match config.resolve_api_key() {
            Some(api_key) => {
                let backend_config = ChatCompletionsConfig::new(config.base_url.as_str(), api_key)
                    .with_temperature(config.temperature)
                    .with_attribution(config.app_url.clone(), config.app_title.clone());
                let backend = ChatCompletionsBackend::new(backend_config)?;
                Ok(pipeline.with_backend(Arc::new(backend)))
            }
            None => Ok(pipeline),
        }
    }

    /// Attaches the backend that candidates are sent to.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn RewriteBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replaces the backoff implementation.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Arc<dyn Backoff>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Sets the delay between candidate attempts.
    #[must_use]
    pub const fn with_backoff_delay(mut self, backoff_delay: Duration) -> Self {
        self.backoff_delay = backoff_delay;
        self
    }

    /// Replaces the telemetry sink.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Candidates tried by this pipeline.
    #[must_use]
    pub const fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    /// Whether a backend is attached.
    #[must_use]
    pub const fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Rewrites `request`, always returning a well-formed result.
    ///
    /// Candidate failures fall through to the local enhancement; without a
    /// backend no attempts are made at all.
    #[must_use]
    pub fn rewrite(&self, request: &RewriteRequest) -> RewriteResult {
        let Some(backend) = self.backend.as_deref() else {
            tracing::warn!("no AI API key configured; using local fallback");
            return self.degrade(request, 0, "no AI API key configured");
        };

        let prompt = build_prompt(request);
        let dispatcher = FallbackDispatcher::new(
            backend,
            self.backoff.as_ref(),
            self.backoff_delay,
            self.telemetry.as_ref(),
        );
        let report = dispatcher.dispatch(&prompt, &self.candidates);
        let attempts = report.attempt_count();

        match report.winner() {
            Some(winner) => {
                self.telemetry.record(TelemetryEvent::RewriteSucceeded {
                    candidate: winner.candidate_id.clone(),
                    attempts,
                });
                RewriteResult::generated(winner.text.as_str(), winner.candidate_id.as_str(), attempts)
            }
            None => {
                tracing::warn!(attempts, "all rewrite candidates failed; using local fallback");
                self.degrade(request, attempts, "all backend candidates failed")
            }
        }
    }

    fn degrade(&self, request: &RewriteRequest, attempts: usize, reason: &str) -> RewriteResult {
        self.telemetry.record(TelemetryEvent::DegradedModeUsed {
            attempts,
            reason: reason.to_owned(),
        });
        let text = enhance_locally(
            request.original_text(),
            request.tone(),
            request.target_language(),
        );
        RewriteResult::degraded(text, attempts)
    }
}
