//! Ollama HTTP completion provider.
//!
//! Different Ollama versions and compatible servers expose generation under
//! different paths, so each request walks a fixed list of endpoints and
//! returns the first successful answer. Several response shapes are accepted:
//!
//! - `{"choices": [{"content": "..."}]}` or `{"choices": [{"text": "..."}]}`
//! - `{"text": "..."}`
//! - `{"response": "..."}` (native `/api/generate` with `stream: false`)
//! - `{"result": <any>}`
//!
//! Any other JSON object is returned as its serialized form, truncated.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use guriri_core::completion::provider::CompletionProvider;
use guriri_types::completion::CompletionRequest;
use guriri_types::error::CompletionError;

/// Paths tried in order, relative to the configured host.
pub const ENDPOINT_PATHS: [&str; 4] = ["/v1/generate", "/api/generate", "/v1/complete", "/api/complete"];

/// Maximum length of a raw JSON body used as reply text.
const MAX_RAW_REPLY_CHARS: usize = 2000;

/// Maximum length of an error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 400;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    stream: bool,
}

/// Completion provider backed by a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    client: reqwest::Client,
    host: String,
    model: String,
    timeout: Duration,
}

impl OllamaProvider {
    /// Build a provider for `host` (e.g. `http://127.0.0.1:11434`).
    ///
    /// `timeout` bounds each individual HTTP request.
    pub fn new(host: &str, model: &str, timeout: Duration) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CompletionError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoints(&self) -> impl Iterator<Item = String> + '_ {
        ENDPOINT_PATHS
            .iter()
            .map(move |path| format!("{}{}", self.host, path))
    }

    async fn try_endpoint(
        &self,
        endpoint: &str,
        body: &GenerateRequest<'_>,
    ) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(self.timeout.as_millis() as u64)
                } else {
                    CompletionError::Http(format!("{endpoint}: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: truncate_chars(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Deserialization(format!("{endpoint}: {e}")))?;

        extract_reply(&json).ok_or_else(|| {
            CompletionError::Deserialization(format!("{endpoint}: response is not a JSON object"))
        })
    }
}

impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let mut last_error = None;
        for endpoint in self.endpoints() {
            match self.try_endpoint(&endpoint, &body).await {
                Ok(reply) => {
                    debug!(endpoint = %endpoint, chars = reply.len(), "Completion received");
                    return Ok(reply);
                }
                Err(err) => {
                    debug!(endpoint = %endpoint, error = %err, "Completion endpoint failed");
                    last_error = Some(err);
                }
            }
        }

        let last = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no endpoints configured".to_string());
        warn!(host = %self.host, error = %last, "Ollama call failed");
        Err(CompletionError::Exhausted(last))
    }
}

/// Pull reply text out of a completion response body.
///
/// Returns `None` when the body is not a JSON object.
fn extract_reply(json: &Value) -> Option<String> {
    let object = json.as_object()?;

    if let Some(first) = object
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(Value::as_object)
    {
        for key in ["content", "text"] {
            if let Some(value) = first.get(key) {
                return Some(value_to_text(value));
            }
        }
    }

    for key in ["text", "response"] {
        if let Some(value) = object.get(key) {
            return Some(value_to_text(value));
        }
    }

    if let Some(result) = object.get("result") {
        return Some(value_to_text(result));
    }

    Some(truncate_chars(&json.to_string(), MAX_RAW_REPLY_CHARS))
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
