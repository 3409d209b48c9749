//! Maps rewrite results to what the caller shows the user.

use super::model::RewriteResult;

/// Warning shown alongside degraded-mode text.
pub const DEGRADED_NOTICE: &str =
    "AI rewrite unavailable; showing a basic local enhancement instead";

/// User-facing rendering of a [`RewriteResult`].
///
/// Exactly one of display text or a failure notice is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    /// Text to show the user.
    Display {
        /// Rewritten text.
        text: String,
        /// Candidate identifier or `"fallback"`.
        source_model: String,
        /// Whether the text came from degraded mode.
        degraded: bool,
    },
    /// Explicit notice that no text could be produced.
    FailureNotice {
        /// Message to show the user.
        message: String,
    },
}

/// Builds the presentation for `result`.
#[must_use]
pub fn present(result: &RewriteResult) -> Presentation {
    let text = result.text().trim();
    if text.is_empty() {
        return Presentation::FailureNotice {
            message: format!(
                "rewrite produced no text after {} attempt(s)",
                result.attempts()
            ),
        };
    }

    Presentation::Display {
        text: text.to_owned(),
        source_model: result.source_model().to_owned(),
        degraded: !result.succeeded(),
    }
}
