//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.tactful.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `TACTFUL_TONE`, `TACTFUL_API_KEY`, or the
//!    provider variables `OPENROUTER_API_KEY` / `OPENAI_API_KEY`
//! 4. **Command-line arguments** – `--text`/`-x`, `--tone`/`-t`, and friends
//!
//! # Configuration File
//!
//! ```toml
//! tone = "formal"
//! language = "French"
//! models = "mistralai/mistral-7b-instruct@20,openai/gpt-4o-mini"
//! backoff_millis = 500
//! history_log = "~/.local/state/tactful/history.jsonl"
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::export::ExportFormat;
use crate::rewrite::{
    CandidateList, DEFAULT_APP_TITLE, DEFAULT_BASE_URL, DEFAULT_LANGUAGE, RewriteRequest, Tone,
};

/// Default candidate list tried when no `models` value is configured.
pub const DEFAULT_MODELS: &str = "openrouter/mistral-7b-instruct";

/// Provider environment variables consulted, in order, when no API key is
/// configured directly.
pub const PROVIDER_API_KEY_VARS: [&str; 2] = ["OPENROUTER_API_KEY", "OPENAI_API_KEY"];

const DEFAULT_TONE: &str = "friendly";
const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_BACKOFF_MILLIS: u64 = 1_000;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Operation mode determined by CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Rewrite the text given with `--text`.
    SingleRewrite,
    /// Rewrite every blank-line separated item in `--input-file`.
    BatchRewrite,
    /// Neither text nor an input file was supplied.
    MissingInput,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// Every field can be set through `TACTFUL_<FIELD>`. The API key additionally
/// falls back to `OPENROUTER_API_KEY` and then `OPENAI_API_KEY`.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use tactful::TactfulConfig;
///
/// let config = TactfulConfig::load().expect("failed to load configuration");
/// let candidates = config.candidate_list().expect("valid candidate list");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "TACTFUL",
    discovery(
        dotfile_name = ".tactful.toml",
        config_file_name = "tactful.toml",
        app_name = "tactful"
    )
)]
pub struct TactfulConfig {
    /// Raw feedback text to rewrite.
    ///
    /// Can be provided via:
    /// - CLI: `--text <TEXT>` or `-x <TEXT>`
    /// - Environment: `TACTFUL_TEXT`
    #[ortho_config(cli_short = 'x')]
    pub text: Option<String>,

    /// File holding several feedback items separated by blank lines.
    ///
    /// Can be provided via:
    /// - CLI: `--input-file <PATH>` or `-i <PATH>`
    /// - Environment: `TACTFUL_INPUT_FILE`
    #[ortho_config(cli_short = 'i')]
    pub input_file: Option<String>,

    /// Tone label: `friendly`, `formal`, `assertive`, `empathetic`,
    /// `managerial`, or `constructive`.
    ///
    /// Can be provided via:
    /// - CLI: `--tone <TONE>` or `-t <TONE>`
    /// - Environment: `TACTFUL_TONE`
    /// - Config file: `tone = "formal"`
    #[ortho_config(cli_short = 't')]
    pub tone: String,

    /// Language the rewrite must be written in.
    ///
    /// Can be provided via:
    /// - CLI: `--language <LANGUAGE>` or `-l <LANGUAGE>`
    /// - Environment: `TACTFUL_LANGUAGE`
    /// - Config file: `language = "French"`
    #[ortho_config(cli_short = 'l')]
    pub language: String,

    /// Formats the rewrite as a complete email with greeting and closing.
    ///
    /// Can be provided via:
    /// - CLI: `--email` or `-e`
    /// - Config file: `email = true`
    #[ortho_config(cli_short = 'e')]
    pub email: bool,

    /// API key for the chat completions provider.
    ///
    /// Can be provided via:
    /// - CLI: `--api-key <KEY>` or `-k <KEY>`
    /// - Environment: `TACTFUL_API_KEY`, `OPENROUTER_API_KEY`, or
    ///   `OPENAI_API_KEY`
    /// - Config file: `api_key = "..."`
    ///
    /// When no key resolves, every rewrite uses the local fallback.
    #[ortho_config(cli_short = 'k')]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible chat completions API.
    ///
    /// Can be provided via:
    /// - CLI: `--base-url <URL>`
    /// - Environment: `TACTFUL_BASE_URL`
    /// - Config file: `base_url = "..."`
    #[ortho_config()]
    pub base_url: String,

    /// Comma-separated candidate models, tried in order.
    ///
    /// Each entry is a model identifier, optionally followed by
    /// `@<seconds>` to override the per-attempt timeout, for example
    /// `fast-model@10,slow-model`.
    ///
    /// Can be provided via:
    /// - CLI: `--models <LIST>` or `-m <LIST>`
    /// - Environment: `TACTFUL_MODELS`
    /// - Config file: `models = "..."`
    #[ortho_config(cli_short = 'm')]
    pub models: String,

    /// Default per-attempt timeout in seconds.
    ///
    /// Can be provided via:
    /// - CLI: `--timeout-seconds <SECONDS>`
    /// - Environment: `TACTFUL_TIMEOUT_SECONDS`
    /// - Config file: `timeout_seconds = 30`
    #[ortho_config()]
    pub timeout_seconds: u64,

    /// Pause between failed candidate attempts, in milliseconds.
    ///
    /// Can be provided via:
    /// - CLI: `--backoff-millis <MILLIS>`
    /// - Environment: `TACTFUL_BACKOFF_MILLIS`
    /// - Config file: `backoff_millis = 1000`
    #[ortho_config()]
    pub backoff_millis: u64,

    /// Sampling temperature sent with every request.
    ///
    /// Can be provided via:
    /// - CLI: `--temperature <VALUE>`
    /// - Environment: `TACTFUL_TEMPERATURE`
    /// - Config file: `temperature = 0.7`
    #[ortho_config()]
    pub temperature: f32,

    /// Public application URL sent as the `HTTP-Referer` header.
    ///
    /// Can be provided via:
    /// - CLI: `--app-url <URL>`
    /// - Environment: `TACTFUL_APP_URL`
    /// - Config file: `app_url = "..."`
    #[ortho_config()]
    pub app_url: Option<String>,

    /// Application title sent as the `X-Title` header.
    ///
    /// Can be provided via:
    /// - CLI: `--app-title <TITLE>`
    /// - Environment: `TACTFUL_APP_TITLE`
    /// - Config file: `app_title = "..."`
    #[ortho_config()]
    pub app_title: Option<String>,

    /// Append every completed rewrite to this JSON Lines file.
    ///
    /// Can be provided via:
    /// - CLI: `--history-log <PATH>`
    /// - Environment: `TACTFUL_HISTORY_LOG`
    /// - Config file: `history_log = "..."`
    #[ortho_config()]
    pub history_log: Option<String>,

    /// Built-in export format for the session history (`markdown`, `jsonl`
    /// or `csv`).
    ///
    /// Can be provided via:
    /// - CLI: `--export-format <FORMAT>`
    /// - Environment: `TACTFUL_EXPORT_FORMAT`
    #[ortho_config()]
    pub export_format: Option<String>,

    /// Destination file for the session history export.
    ///
    /// Can be provided via:
    /// - CLI: `--export-path <PATH>`
    /// - Environment: `TACTFUL_EXPORT_PATH`
    #[ortho_config()]
    pub export_path: Option<String>,

    /// Jinja2 template file used to render the session history export.
    ///
    /// Mutually exclusive with `export_format`.
    ///
    /// Can be provided via:
    /// - CLI: `--export-template <PATH>`
    /// - Environment: `TACTFUL_EXPORT_TEMPLATE`
    #[ortho_config()]
    pub export_template: Option<String>,

    /// Writes structured telemetry events to stderr as JSON lines.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry`
    /// - Config file: `telemetry = true`
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for TactfulConfig {
    fn default() -> Self {
        Self {
            text: None,
            input_file: None,
            tone: DEFAULT_TONE.to_owned(),
            language: DEFAULT_LANGUAGE.to_owned(),
            email: false,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            models: DEFAULT_MODELS.to_owned(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            backoff_millis: DEFAULT_BACKOFF_MILLIS,
            temperature: DEFAULT_TEMPERATURE,
            app_url: None,
            app_title: Some(DEFAULT_APP_TITLE.to_owned()),
            history_log: None,
            export_format: None,
            export_path: None,
            export_template: None,
            telemetry: false,
        }
    }
}

impl TactfulConfig {
    /// Resolves the provider API key.
    ///
    /// Returns the configured key, or the first non-blank value of
    /// [`PROVIDER_API_KEY_VARS`]. Blank values are treated as absent.
    #[must_use]
    pub fn resolve_api_key(&self) -> Option<String> {
        non_blank(self.api_key.clone()).or_else(|| {
            PROVIDER_API_KEY_VARS
                .iter()
                .find_map(|name| non_blank(env::var(name).ok()))
        })
    }

    /// Parses the configured tone label.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] for unknown tone labels.
    pub fn resolve_tone(&self) -> Result<Tone, RewriteError> {
        self.tone
            .parse::<Tone>()
            .map_err(|error| RewriteError::Configuration {
                message: error.to_string(),
            })
    }

    /// Parses `models` into an ordered candidate list using
    /// `timeout_seconds` as the default per-attempt timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the list is empty,
    /// malformed, or the default timeout is zero.
    pub fn candidate_list(&self) -> Result<CandidateList, RewriteError> {
        if self.timeout_seconds == 0 {
            return Err(RewriteError::Configuration {
                message: "timeout_seconds must be greater than zero".to_owned(),
            });
        }
        CandidateList::parse(&self.models, Duration::from_secs(self.timeout_seconds))
    }

    /// Pause between failed candidate attempts.
    #[must_use]
    pub const fn backoff_delay(&self) -> Duration {
        Duration::from_millis(self.backoff_millis)
    }

    /// Determines the operation mode based on configuration.
    ///
    /// Direct text takes priority over an input file.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.text.is_some() {
            OperationMode::SingleRewrite
        } else if self.input_file.is_some() {
            OperationMode::BatchRewrite
        } else {
            OperationMode::MissingInput
        }
    }

    /// Returns the feedback text.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::EmptyInput`] if no text was supplied.
    pub fn require_text(&self) -> Result<&str, RewriteError> {
        self.text.as_deref().ok_or(RewriteError::EmptyInput)
    }

    /// Returns the batch input file path.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] if no input file was supplied.
    pub fn require_input_file(&self) -> Result<&str, RewriteError> {
        self.input_file
            .as_deref()
            .ok_or_else(|| RewriteError::Configuration {
                message: "input file is required (use --input-file or -i)".to_owned(),
            })
    }

    /// Builds a rewrite request for `text` using the configured tone,
    /// language, and email flag.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] for an unknown tone and
    /// [`RewriteError::EmptyInput`] for blank text.
    pub fn rewrite_request(&self, text: &str) -> Result<RewriteRequest, RewriteError> {
        let tone = self.resolve_tone()?;
        Ok(RewriteRequest::new(text, tone)?
            .with_language(self.language.as_str())
            .with_email_format(self.email))
    }

    /// Returns the history log path with a leading `~` expanded to the home
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when the path starts with `~`
    /// and the home directory is unknown or not valid UTF-8.
    pub fn history_log_path(&self) -> Result<Option<Utf8PathBuf>, RewriteError> {
        self.history_log
            .as_deref()
            .map(|path| expand_home(Utf8Path::new(path), dirs::home_dir()))
            .transpose()
    }

    /// Parses the configured export format, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] for unsupported formats.
    pub fn resolve_export_format(&self) -> Result<Option<ExportFormat>, RewriteError> {
        self.export_format
            .as_deref()
            .map(str::parse::<ExportFormat>)
            .transpose()
    }

    /// Validates configuration consistency.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Configuration`] when:
    /// - `export_format` names an unsupported format
    /// - both `export_format` and `export_template` are set
    /// - an export is requested without `export_path`
    /// - `temperature` lies outside `0.0..=2.0`
    pub fn validate(&self) -> Result<(), RewriteError> {
        self.resolve_export_format()?;

        if self.export_format.is_some() && self.export_template.is_some() {
            return Err(RewriteError::Configuration {
                message: "--export-format and --export-template cannot be used together"
                    .to_owned(),
            });
        }

        if (self.export_format.is_some() || self.export_template.is_some())
            && self.export_path.is_none()
        {
            return Err(RewriteError::Configuration {
                message: "export requires an output file (use --export-path)".to_owned(),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(RewriteError::Configuration {
                message: format!(
                    "temperature must be between 0.0 and 2.0, got {}",
                    self.temperature
                ),
            });
        }

        Ok(())
    }
}

/// Expands a leading `~` component of `path` against `home`.
///
/// `~user` forms are left untouched.
pub(crate) fn expand_home(
    path: &Utf8Path,
    home: Option<PathBuf>,
) -> Result<Utf8PathBuf, RewriteError> {
    let Ok(rest) = path.strip_prefix("~") else {
        return Ok(path.to_path_buf());
    };
    let home = home.ok_or_else(|| RewriteError::Configuration {
        message: format!("cannot expand '{path}': home directory is unknown"),
    })?;
    let home = Utf8PathBuf::from_path_buf(home).map_err(|dir| RewriteError::Configuration {
        message: format!(
            "cannot expand '{path}': home directory '{}' is not valid UTF-8",
            dir.display()
        ),
    })?;
    Ok(home.join(rest))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|candidate| !candidate.trim().is_empty())
}

#[cfg(test)]
mod tests;
