//! OpenAI-compatible chat-completions backend over blocking HTTP.

use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RewriteError;

use super::backend::{BackendError, RewriteBackend};
use super::candidate::ModelCandidate;
use super::prompt::PromptPair;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// Default application title reported to the provider.
pub const DEFAULT_APP_TITLE: &str = "Feedback Rewriter Assistant";

const ERROR_BODY_LIMIT: usize = 160;

/// Configuration for [`ChatCompletionsBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionsConfig {
    /// Base API URL (e.g., `https://openrouter.ai/api/v1`).
    pub base_url: String,
    /// API key used for bearer authentication.
    pub api_key: String,
    /// Sampling temperature; omitted from the request when `None`.
    pub temperature: Option<f32>,
    /// Public URL of the calling application, sent as `HTTP-Referer`.
    pub app_url: Option<String>,
    /// Application title, sent as `X-Title`.
    pub app_title: Option<String>,
    /// Additional request headers (primarily useful for deterministic tests).
    #[cfg(any(test, feature = "test-support"))]
    pub additional_headers: Vec<(String, String)>,
}

impl ChatCompletionsConfig {
    /// Constructs configuration with the required API settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            temperature: None,
            app_url: None,
            app_title: None,
            #[cfg(any(test, feature = "test-support"))]
            additional_headers: Vec::new(),
        }
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the attribution headers sent with every request.
    #[must_use]
    pub fn with_attribution(mut self, app_url: Option<String>, app_title: Option<String>) -> Self {
        self.app_url = app_url;
        self.app_title = app_title;
        self
    }

    /// Adds one extra HTTP header.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn with_additional_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.additional_headers.push((name.into(), value.into()));
        self
    }
}

/// Chat-completions backend shared across attempts.
///
/// The HTTP client is built once; each attempt applies the candidate's own
/// timeout and endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsBackend {
    config: ChatCompletionsConfig,
    client: Client,
}

impl ChatCompletionsBackend {
    /// Creates a backend from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the API key is blank, the
    /// base URL is invalid, or the HTTP client cannot be configured.
    pub fn new(config: ChatCompletionsConfig) -> Result<Self, RewriteError> {
        if config.api_key.trim().is_empty() {
            return Err(RewriteError::Configuration {
                message: concat!(
                    "AI API key is required (use --api-key, ",
                    "TACTFUL_API_KEY, OPENROUTER_API_KEY, or OPENAI_API_KEY)"
                )
                .to_owned(),
            });
        }
        completions_endpoint(config.base_url.as_str())?;

        let client = Client::builder()
            .build()
            .map_err(|error| RewriteError::Configuration {
                message: format!("failed to configure AI HTTP client: {error}"),
            })?;

        Ok(Self { config, client })
    }

    fn build_request(
        &self,
        endpoint: Url,
        candidate: &ModelCandidate,
        prompt: &PromptPair,
    ) -> RequestBuilder {
        let payload = ChatCompletionsRequest {
            model: candidate.id(),
            messages: vec![
                ChatCompletionsMessage {
                    role: "system",
                    content: prompt.system.as_str(),
                },
                ChatCompletionsMessage {
                    role: "user",
                    content: prompt.user.as_str(),
                },
            ],
            temperature: self.config.temperature,
        };

        let mut builder = self
            .client
            .post(endpoint)
            .timeout(candidate.timeout())
            .bearer_auth(self.config.api_key.as_str())
            .json(&payload);

        if let Some(app_url) = self.config.app_url.as_deref() {
            builder = builder.header("HTTP-Referer", app_url);
        }
        if let Some(app_title) = self.config.app_title.as_deref() {
            builder = builder.header("X-Title", app_title);
        }
        #[cfg(any(test, feature = "test-support"))]
        for (name, value) in &self.config.additional_headers {
            builder = builder.header(name, value);
        }

        builder
    }
}

impl RewriteBackend for ChatCompletionsBackend {
    fn complete(
        &self,
        candidate: &ModelCandidate,
        prompt: &PromptPair,
    ) -> Result<String, BackendError> {
        let base_url = candidate
            .base_url()
            .unwrap_or(self.config.base_url.as_str());
        let endpoint = completions_endpoint(base_url).map_err(|error| BackendError::Transport {
            message: error.to_string(),
        })?;

        let response = self
            .build_request(endpoint, candidate, prompt)
            .send()
            .map_err(|error| classify_transport_error(&error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().map_or_else(
                |_| "(failed to read error response body)".to_owned(),
                |content| truncate_for_message(content.as_str(), ERROR_BODY_LIMIT),
            );
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ChatCompletionsResponse = response.json().map_err(|error| {
            if error.is_timeout() {
                return classify_transport_error(&error);
            }
            BackendError::Malformed {
                message: format!("JSON decoding failed: {error}"),
            }
        })?;

        payload
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_ref())
            .and_then(parse_content_value)
            .map(ToOwned::to_owned)
            .ok_or_else(|| BackendError::Malformed {
                message: "response did not contain assistant text".to_owned(),
            })
    }
}

/// Joins `base_url` with the `chat/completions` path.
fn completions_endpoint(base_url: &str) -> Result<Url, RewriteError> {
    let normalised = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    Url::parse(normalised.as_str()).map_err(|error| RewriteError::Configuration {
        message: format!("AI base URL '{base_url}' is invalid: {error}"),
    })
}

fn classify_transport_error(error: &reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::Timeout {
            message: error.to_string(),
        }
    } else {
        BackendError::Transport {
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatCompletionsMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatCompletionsMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<ChatContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatContent {
    Text(String),
    Parts(Vec<ChatContentPart>),
}

#[derive(Debug, Deserialize)]
struct ChatContentPart {
    text: Option<String>,
    content: Option<String>,
}

fn parse_content_value(content: &ChatContent) -> Option<&str> {
    match content {
        ChatContent::Text(text) => Some(text.as_str()),
        ChatContent::Parts(parts) => parts
            .iter()
            .find_map(|part| part.text.as_deref().or(part.content.as_deref())),
    }
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output: String = message.chars().take(max_chars).collect();
    if message.chars().nth(max_chars).is_some() {
        output.push_str("...");
    }
    output
}

#[cfg(test)]
#[path = "chat_completions_tests.rs"]
mod tests;
