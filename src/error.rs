//! Error types exposed by the rewrite pipeline and its adapters.

use thiserror::Error;

/// Errors surfaced while validating input, loading configuration, or writing
/// output.
///
/// Individual backend attempts never produce this type; they are classified
/// by the dispatcher and folded into a [`crate::RewriteResult`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RewriteError {
    /// The feedback text was empty or whitespace-only.
    #[error("feedback text is required; please enter your feedback first")]
    EmptyInput,

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// An export template could not be compiled or rendered.
    #[error("template error: {message}")]
    Template {
        /// Details from the template engine.
        message: String,
    },
}
