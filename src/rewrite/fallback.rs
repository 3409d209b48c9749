//! Deterministic degraded-mode rewrite used when no backend succeeds.
//!
//! This is a placeholder, not a translator: it tidies whitespace, expands a
//! fixed set of contractions, fixes capitalisation and tags the text with the
//! requested tone.

use super::model::Tone;

const CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("i'm", "I am"),
    ("it's", "it is"),
    ("you're", "you are"),
    ("i", "I"),
];

/// Marker prefixed to every degraded-mode result.
#[must_use]
pub fn enhancement_marker(tone: Tone) -> String {
    format!("[{} Enhancement]", tone.title())
}

/// Produces degraded-mode output for `text`.
///
/// Total for every input: the result always starts with the tone marker and
/// is never empty. `language` is accepted for parity with the backend path but
/// no translation happens.
#[must_use]
pub fn enhance_locally(text: &str, tone: Tone, language: &str) -> String {
    tracing::debug!(tone = tone.label(), language, "producing local fallback rewrite");

    let body = text
        .split_whitespace()
        .map(expand_word)
        .collect::<Vec<_>>()
        .join(" ");
    let marker = enhancement_marker(tone);

    if body.is_empty() {
        return marker;
    }
    format!("{marker} {}", capitalise_first(body.as_str()))
}

fn expand_word(word: &str) -> String {
    let normalised = word.replace('\u{2019}', "'");
    let core = normalised.trim_end_matches(|character: char| {
        !character.is_alphanumeric() && character != '\''
    });
    let suffix = normalised.strip_prefix(core).unwrap_or_default();
    let lowered = core.to_lowercase();

    let Some((_, replacement)) = CONTRACTIONS
        .iter()
        .find(|(contraction, _)| *contraction == lowered)
    else {
        return word.to_owned();
    };

    let starts_upper = core.chars().next().is_some_and(char::is_uppercase);
    let expanded = if starts_upper {
        capitalise_first(replacement)
    } else {
        (*replacement).to_owned()
    };
    format!("{expanded}{suffix}")
}

fn capitalise_first(text: &str) -> String {
    let mut characters = text.chars();
    characters.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(characters).collect()
    })
}
