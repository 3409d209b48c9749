//! Backend seam and per-attempt outcome classification.

use std::fmt;

use thiserror::Error;

use super::candidate::ModelCandidate;
use super::prompt::PromptPair;

/// A chat-completion provider that can rewrite text with a given candidate.
pub trait RewriteBackend: Send + Sync + fmt::Debug {
    /// Sends `prompt` to `candidate` and returns the assistant text.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] when the attempt fails in transport, is
    /// rejected, or yields a response without assistant text.
    fn complete(
        &self,
        candidate: &ModelCandidate,
        prompt: &PromptPair,
    ) -> Result<String, BackendError>;
}

/// Failure of a single backend attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The attempt exceeded the candidate timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Transport error detail.
        message: String,
    },

    /// The connection failed before a response arrived.
    #[error("transport failed: {message}")]
    Transport {
        /// Transport error detail.
        message: String,
    },

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// The backend answered 2xx but the body did not match the expected shape.
    #[error("malformed response: {message}")]
    Malformed {
        /// Decoding error detail.
        message: String,
    },
}

/// Classification of one attempt, as seen by the dispatcher.
///
/// Every attempt maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The backend returned non-empty text (already trimmed).
    Text(String),
    /// The backend succeeded but the text was empty.
    EmptyText,
    /// Timeout or connection failure.
    TransportFailure {
        /// Whether the failure was a timeout.
        timed_out: bool,
        /// Error detail.
        message: String,
    },
    /// Non-2xx status, malformed body, or missing content.
    Rejected {
        /// HTTP status when the backend answered with one.
        status: Option<u16>,
        /// Error detail.
        message: String,
    },
}

impl AttemptOutcome {
    /// Classifies a raw backend result.
    #[must_use]
    pub fn classify(result: Result<String, BackendError>) -> Self {
        match result {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Self::EmptyText
                } else {
                    Self::Text(trimmed.to_owned())
                }
            }
            Err(BackendError::Timeout { message }) => Self::TransportFailure {
                timed_out: true,
                message,
            },
            Err(BackendError::Transport { message }) => Self::TransportFailure {
                timed_out: false,
                message,
            },
            Err(error @ BackendError::Status { status, .. }) => Self::Rejected {
                status: Some(status),
                message: error.to_string(),
            },
            Err(error @ BackendError::Malformed { .. }) => Self::Rejected {
                status: None,
                message: error.to_string(),
            },
        }
    }

    /// Stable snake-case label used in logs and telemetry.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::EmptyText => "empty_text",
            Self::TransportFailure { .. } => "transport_failure",
            Self::Rejected { .. } => "rejected",
        }
    }

    /// Human-readable failure detail; empty for usable text.
    #[must_use]
    pub fn detail(&self) -> &str {
        match self {
            Self::Text(_) => "",
            Self::EmptyText => "response contained no assistant text",
            Self::TransportFailure { message, .. } | Self::Rejected { message, .. } => {
                message.as_str()
            }
        }
    }

    /// Whether the backend signalled a rate limit or missing credit.
    ///
    /// These are still advanced past like any other rejection.
    #[must_use]
    pub const fn is_quota_rejection(&self) -> bool {
        matches!(
            self,
            Self::Rejected {
                status: Some(402 | 429),
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{AttemptOutcome, BackendError};

    #[test]
    fn classify_trims_usable_text() {
        let outcome = AttemptOutcome::classify(Ok("  Please arrive on time.\n".to_owned()));

        assert_eq!(outcome, AttemptOutcome::Text("Please arrive on time.".to_owned()));
        assert_eq!(outcome.label(), "text");
    }

    #[rstest]
    #[case("")]
    #[case(" \n\t ")]
    fn classify_blank_text_as_empty(#[case] text: &str) {
        assert_eq!(
            AttemptOutcome::classify(Ok(text.to_owned())),
            AttemptOutcome::EmptyText
        );
    }

    #[test]
    fn classify_timeout_as_transport_failure() {
        let outcome = AttemptOutcome::classify(Err(BackendError::Timeout {
            message: "deadline".to_owned(),
        }));

        assert!(matches!(
            outcome,
            AttemptOutcome::TransportFailure {
                timed_out: true,
                ..
            }
        ));
        assert_eq!(outcome.detail(), "deadline");
    }

    #[test]
    fn classify_connection_error_as_transport_failure() {
        let outcome = AttemptOutcome::classify(Err(BackendError::Transport {
            message: "refused".to_owned(),
        }));

        assert!(matches!(
            outcome,
            AttemptOutcome::TransportFailure {
                timed_out: false,
                ..
            }
        ));
    }

    #[rstest]
    #[case(BackendError::Status { status: 500, body: "boom".to_owned() }, Some(500))]
    #[case(BackendError::Malformed { message: "missing field `choices`".to_owned() }, None)]
    fn classify_rejections(#[case] error: BackendError, #[case] status: Option<u16>) {
        let outcome = AttemptOutcome::classify(Err(error));

        let AttemptOutcome::Rejected {
            status: actual,
            message,
        } = outcome
        else {
            panic!("expected rejected outcome");
        };
        assert_eq!(actual, status);
        assert!(!message.is_empty());
    }

    #[rstest]
    #[case(402, true)]
    #[case(429, true)]
    #[case(500, false)]
    fn quota_rejections_are_flagged(#[case] status: u16, #[case] expected: bool) {
        let outcome = AttemptOutcome::classify(Err(BackendError::Status {
            status,
            body: String::new(),
        }));

        assert_eq!(outcome.is_quota_rejection(), expected);
    }
}
