//! Feedback rewrite pipeline: prompt building, ordered model fallback and
//! degraded-mode output.

mod backend;
mod candidate;
mod chat_completions;
mod dispatcher;
mod fallback;
mod model;
mod pipeline;
mod presenter;
mod prompt;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use backend::{AttemptOutcome, BackendError, RewriteBackend};
pub use candidate::{CandidateList, DEFAULT_CANDIDATE_TIMEOUT, ModelCandidate};
pub use chat_completions::{
    ChatCompletionsBackend, ChatCompletionsConfig, DEFAULT_APP_TITLE, DEFAULT_BASE_URL,
};
pub use dispatcher::{
    AttemptRecord, Backoff, DEFAULT_BACKOFF_DELAY, DispatchReport, DispatchWinner,
    FallbackDispatcher, ThreadSleepBackoff,
};
pub use fallback::{enhance_locally, enhancement_marker};
pub use model::{
    DEFAULT_LANGUAGE, FALLBACK_SOURCE_LABEL, RewriteRequest, RewriteResult, RewriteSource, Tone,
    ToneParseError,
};
pub use pipeline::RewritePipeline;
pub use presenter::{DEGRADED_NOTICE, Presentation, present};
pub use prompt::{PromptPair, build_prompt};
