//! Tactful library crate for rewriting raw feedback in a chosen tone.
//!
//! The library builds a tone- and language-specific prompt, sends it to an
//! ordered list of candidate models behind an OpenAI-compatible chat
//! completions API, and falls back to a deterministic local enhancement when
//! every candidate fails. Completed rewrites can be kept in a session history
//! and exported as Markdown, JSON Lines, or through a custom template.

pub mod config;
pub mod error;
pub mod export;
pub mod history;
pub mod rewrite;
pub mod telemetry;

pub use config::{OperationMode, TactfulConfig};
pub use error::RewriteError;
pub use export::ExportFormat;
pub use history::{HistoryEntry, HistoryLog, SessionHistory};
pub use rewrite::{
    CandidateList, ModelCandidate, Presentation, RewritePipeline, RewriteRequest, RewriteResult,
    Tone, present,
};
pub use telemetry::{TelemetryEvent, TelemetrySink};
