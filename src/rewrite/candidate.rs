//! Ordered backend candidates tried by the fallback dispatcher.

use std::time::Duration;

use crate::error::RewriteError;

/// Per-attempt timeout used when a candidate does not override it.
pub const DEFAULT_CANDIDATE_TIMEOUT: Duration = Duration::from_secs(30);

/// One interchangeable backend model target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    id: String,
    timeout: Duration,
    base_url: Option<String>,
}

impl ModelCandidate {
    /// Creates a candidate with the default timeout and no endpoint override.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timeout: DEFAULT_CANDIDATE_TIMEOUT,
            base_url: None,
        }
    }

    /// Overrides the per-attempt timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends this candidate's requests to a different API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Model identifier sent to the backend.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Endpoint override, if any.
    #[must_use]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Non-empty candidate sequence in fixed priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    candidates: Vec<ModelCandidate>,
}

impl CandidateList {
    /// Wraps an ordered candidate sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when `candidates` is empty.
    pub fn new(candidates: Vec<ModelCandidate>) -> Result<Self, RewriteError> {
        if candidates.is_empty() {
            return Err(RewriteError::Configuration {
                message: "at least one backend model is required (use --models)".to_owned(),
            });
        }
        Ok(Self { candidates })
    }

    /// Parses a comma-separated list of `id` or `id@<seconds>` entries.
    ///
    /// Entries without an explicit timeout use `default_timeout`. Blank
    /// entries are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when no entries remain or a
    /// timeout suffix is not a positive whole number of seconds.
    pub fn parse(list: &str, default_timeout: Duration) -> Result<Self, RewriteError> {
        let candidates = list
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| parse_entry(entry, default_timeout))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(candidates)
    }

    /// Candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &ModelCandidate> {
        self.candidates.iter()
    }

    /// Number of candidates.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the list is empty; never true for a constructed list.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateList {
    type Item = &'a ModelCandidate;
    type IntoIter = std::slice::Iter<'a, ModelCandidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

fn parse_entry(entry: &str, default_timeout: Duration) -> Result<ModelCandidate, RewriteError> {
    let Some((id, seconds)) = entry.rsplit_once('@') else {
        return Ok(ModelCandidate::new(entry).with_timeout(default_timeout));
    };

    let trimmed_id = id.trim();
    if trimmed_id.is_empty() {
        return Err(RewriteError::Configuration {
            message: format!("model entry '{entry}' is missing an identifier"),
        });
    }

    let timeout_secs = seconds
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| RewriteError::Configuration {
            message: format!(
                "model entry '{entry}' has an invalid timeout; expected a positive number of seconds"
            ),
        })?;

    Ok(ModelCandidate::new(trimmed_id).with_timeout(Duration::from_secs(timeout_secs)))
}
