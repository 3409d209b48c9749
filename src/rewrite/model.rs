//! Shared domain models for feedback rewriting.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::RewriteError;

/// Target language used when the caller does not pick one.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Label reported as the source of a degraded-mode result.
pub const FALLBACK_SOURCE_LABEL: &str = "fallback";

/// Style label that parameterises the rewrite instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Warm and approachable.
    Friendly,
    /// Polished and professional.
    Formal,
    /// Direct and confident.
    Assertive,
    /// Gentle and understanding.
    Empathetic,
    /// Goal-oriented and professional.
    Managerial,
    /// Focused on solutions and next steps.
    Constructive,
}

impl Tone {
    /// Every supported tone, in the order the CLI lists them.
    pub const ALL: [Self; 6] = [
        Self::Friendly,
        Self::Formal,
        Self::Assertive,
        Self::Empathetic,
        Self::Managerial,
        Self::Constructive,
    ];

    /// Lower-case label used in prompts and configuration.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Formal => "formal",
            Self::Assertive => "assertive",
            Self::Empathetic => "empathetic",
            Self::Managerial => "managerial",
            Self::Constructive => "constructive",
        }
    }

    /// Capitalised label used in user-facing markers.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Friendly => "Friendly",
            Self::Formal => "Formal",
            Self::Assertive => "Assertive",
            Self::Empathetic => "Empathetic",
            Self::Managerial => "Managerial",
            Self::Constructive => "Constructive",
        }
    }

    /// Style directive sent to the backend for this tone.
    #[must_use]
    pub const fn directive(self) -> &'static str {
        match self {
            Self::Friendly => "Use warm, upbeat and approachable language.",
            Self::Formal => "Use polished, professional wording and avoid slang or contractions.",
            Self::Assertive => "Be clear and direct; state expectations confidently without hostility.",
            Self::Empathetic => "Use gentle, understanding language.",
            Self::Managerial => "Be direct but professional and goal-oriented.",
            Self::Constructive => "Focus on solutions and next steps.",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Parse error for [`Tone`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "unsupported tone '{value}': valid options are 'friendly', 'formal', 'assertive', \
     'empathetic', 'managerial' or 'constructive'"
)]
pub struct ToneParseError {
    value: String,
}

impl FromStr for Tone {
    type Err = ToneParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalised = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tone| tone.label() == normalised)
            .ok_or_else(|| ToneParseError {
                value: value.to_owned(),
            })
    }
}

/// Validated input for one rewrite submission.
///
/// Construction rejects empty feedback, so a pipeline never sees a request
/// without text to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    original_text: String,
    tone: Tone,
    target_language: String,
    email_format: bool,
}

impl RewriteRequest {
    /// Builds a request for `original_text` in the given tone.
    ///
    /// The text is trimmed. The target language defaults to
    /// [`DEFAULT_LANGUAGE`] and email formatting is off.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::EmptyInput`] when the text is empty or
    /// whitespace-only.
    pub fn new(original_text: impl AsRef<str>, tone: Tone) -> Result<Self, RewriteError> {
        let trimmed = original_text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RewriteError::EmptyInput);
        }

        Ok(Self {
            original_text: trimmed.to_owned(),
            tone,
            target_language: DEFAULT_LANGUAGE.to_owned(),
            email_format: false,
        })
    }

    /// Sets the target language. Blank values keep the default.
    #[must_use]
    pub fn with_language(mut self, target_language: impl AsRef<str>) -> Self {
        let trimmed = target_language.as_ref().trim();
        if !trimmed.is_empty() {
            trimmed.clone_into(&mut self.target_language);
        }
        self
    }

    /// Requests a complete email (greeting, body and closing).
    #[must_use]
    pub const fn with_email_format(mut self, email_format: bool) -> Self {
        self.email_format = email_format;
        self
    }

    /// Trimmed feedback text.
    #[must_use]
    pub const fn original_text(&self) -> &str {
        self.original_text.as_str()
    }

    /// Requested tone.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        self.tone
    }

    /// Language the rewrite should be written in.
    #[must_use]
    pub const fn target_language(&self) -> &str {
        self.target_language.as_str()
    }

    /// Whether the rewrite should be formatted as an email.
    #[must_use]
    pub const fn email_format(&self) -> bool {
        self.email_format
    }
}

/// Where the text of a [`RewriteResult`] came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteSource {
    /// A backend candidate produced the text.
    Candidate(String),
    /// The deterministic local fallback produced the text.
    Fallback,
}

impl fmt::Display for RewriteSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Candidate(id) => formatter.write_str(id),
            Self::Fallback => formatter.write_str(FALLBACK_SOURCE_LABEL),
        }
    }
}

/// Outcome of one rewrite submission.
///
/// `succeeded` is true only for text returned by a backend candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    text: String,
    source: RewriteSource,
    attempts: usize,
}

impl RewriteResult {
    /// Result carrying text produced by `candidate_id`.
    #[must_use]
    pub fn generated(
        text: impl Into<String>,
        candidate_id: impl Into<String>,
        attempts: usize,
    ) -> Self {
        Self {
            text: text.into(),
            source: RewriteSource::Candidate(candidate_id.into()),
            attempts,
        }
    }

    /// Result carrying degraded-mode text after `attempts` failed attempts.
    #[must_use]
    pub fn degraded(text: impl Into<String>, attempts: usize) -> Self {
        Self {
            text: text.into(),
            source: RewriteSource::Fallback,
            attempts,
        }
    }

    /// Rewritten text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Provenance of the text.
    #[must_use]
    pub const fn source(&self) -> &RewriteSource {
        &self.source
    }

    /// Candidate identifier, or `"fallback"` for degraded results.
    #[must_use]
    pub fn source_model(&self) -> &str {
        match &self.source {
            RewriteSource::Candidate(id) => id.as_str(),
            RewriteSource::Fallback => FALLBACK_SOURCE_LABEL,
        }
    }

    /// Whether a backend candidate produced the text.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.source, RewriteSource::Candidate(_))
    }

    /// Number of backend attempts made.
    #[must_use]
    pub const fn attempts(&self) -> usize {
        self.attempts
    }
}
