//! Per-invocation rewrite session shared by the CLI modes.

use tactful::{
    HistoryLog, RewriteError, RewritePipeline, RewriteRequest, RewriteResult, SessionHistory,
    TactfulConfig,
};

/// Runs rewrites through one pipeline and records every result.
#[derive(Debug)]
pub struct Session<'a> {
    pipeline: &'a RewritePipeline,
    history: SessionHistory,
    log: Option<HistoryLog>,
}

impl<'a> Session<'a> {
    /// Starts a session, opening the history log when one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] if the history log path cannot
    /// be expanded and [`RewriteError::Io`] if the log cannot be opened.
    pub fn open(config: &TactfulConfig, pipeline: &'a RewritePipeline) -> Result<Self, RewriteError> {
        let log = config
            .history_log_path()?
            .as_deref()
            .map(HistoryLog::open)
            .transpose()?;

        Ok(Self {
            pipeline,
            history: SessionHistory::new(),
            log,
        })
    }

    /// Rewrites `request` and records the outcome.
    ///
    /// A failed history log write is logged and does not discard the result.
    pub fn submit(&mut self, request: &RewriteRequest) -> RewriteResult {
        let result = self.pipeline.rewrite(request);
        let entry = self.history.record(request, &result);
        if let Some(log) = self.log.as_mut()
            && let Err(error) = log.append(&entry)
        {
            tracing::warn!(path = %log.path(), %error, "failed to append to history log");
        }
        result
    }

    /// Rewrites recorded so far.
    pub const fn history(&self) -> &SessionHistory {
        &self.history
    }
}
