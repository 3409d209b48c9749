//! Shared test utilities for the chat completions integration tests.

use std::io;

use serde_json::{Value, json};
use tokio::runtime::Runtime;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path the chat completions backend posts to under the mock base URL.
pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Wiremock server plus the Tokio runtime hosting it.
///
/// The rewrite pipeline is blocking, so the runtime only drives the server;
/// backend calls run on the test thread. Fields drop in declaration order,
/// so the server shuts down before its runtime.
pub struct MockApi {
    server: MockServer,
    runtime: Runtime,
}

impl MockApi {
    /// Starts a fresh mock server on its own runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be created.
    pub fn start() -> Result<Self, io::Error> {
        let runtime = Runtime::new()?;
        let server = runtime.block_on(MockServer::start());
        Ok(Self { server, runtime })
    }

    /// Base URL to configure the backend with.
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    /// Registers `mock` on the server.
    pub fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    /// Number of requests the server has seen.
    pub fn received(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |requests| requests.len())
    }
}

/// Builds a chat completions success body carrying `content`.
pub fn completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

/// Builds a mock that answers requests for `model` with `response`.
pub fn model_mock(model: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(json!({ "model": model })))
        .respond_with(response)
}
