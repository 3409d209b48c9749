//! Prompt construction for rewrite requests.
//!
//! Prompt building is a pure function of the [`RewriteRequest`]: the same
//! request always produces the same instruction pair.

use super::model::RewriteRequest;

/// System instruction and user message sent to a chat-completion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    /// Instruction describing how the text must be rewritten.
    pub system: String,
    /// The feedback text to rewrite.
    pub user: String,
}

impl PromptPair {
    /// Joins both parts into one prompt for single-message protocols.
    #[must_use]
    pub fn combined(&self) -> String {
        format!("{}\n\nText:\n\"\"\"{}\"\"\"", self.system, self.user)
    }
}

/// Builds the prompt pair for a request.
///
/// Plain rewrites ask for a same-meaning rephrasing in a single language
/// without email structure. Email rewrites ask for a greeting, body and
/// closing.
#[must_use]
pub fn build_prompt(request: &RewriteRequest) -> PromptPair {
    let system = if request.email_format() {
        build_email_instruction(request)
    } else {
        build_plain_instruction(request)
    };

    PromptPair {
        system,
        user: request.original_text().to_owned(),
    }
}

fn build_plain_instruction(request: &RewriteRequest) -> String {
    let tone = request.tone();
    let language = request.target_language();

    format!(
        concat!(
            "You are a professional writing assistant that rewrites workplace feedback. ",
            "Rephrase the user's message in a {label} tone. {directive} ",
            "Preserve the original meaning and do not add new claims. ",
            "Write the entire response in {language} only; never mix languages. ",
            "Do not format the response as an email: no greeting, no sign-off, no subject line. ",
            "Return only the rewritten message."
        ),
        label = tone.label(),
        directive = tone.directive(),
        language = language,
    )
}

fn build_email_instruction(request: &RewriteRequest) -> String {
    let tone = request.tone();
    let language = request.target_language();

    format!(
        concat!(
            "You are a professional writing assistant that turns workplace feedback into emails. ",
            "Rewrite the user's message as a complete email in a {label} tone. {directive} ",
            "Include a greeting, a body that preserves the original meaning, and a closing. ",
            "Write the entire email in {language} only; never mix languages. ",
            "Return only the email text."
        ),
        label = tone.label(),
        directive = tone.directive(),
        language = language,
    )
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
