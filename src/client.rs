//! Chat-completion clients, one per provider wire format.
//!
//! The merge pipeline depends only on [`ChatCompletionClient`]. Each
//! implementation splits its work into a pure request builder and a pure
//! response extractor around one shared `send`, so header and body shaping
//! can be checked without a network.
//!
//! | Client | Endpoint | Auth header |
//! |--------|----------|-------------|
//! | [`OpenAiCompatibleClient`] | `{base}/chat/completions` | `Authorization: Bearer` |
//! | [`AzureOpenAiClient`] | `{base path}/chat/completions?{base query}` | `api-key` |
//! | [`AnthropicClient`] | `{base}/messages` | `x-api-key` |
//!
//! There is no retry; the only timeout is the one set on the HTTP client.

use crate::config::{LlmSettings, ProviderKind};
use crate::error::{DeckError, LlmError};
use crate::pipeline::normalize::truncate;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Chars of an error response body kept in [`LlmError::Status`].
const STATUS_BODY_EXCERPT: usize = 300;

/// One system + user exchange returning the raw text content.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Provider label used in logs and errors.
    fn provider(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;
}

/// A fully shaped HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

fn join_endpoint(base: &str, suffix: &str) -> String {
    let base = base.trim().trim_end_matches('/');
    if base.to_ascii_lowercase().ends_with(suffix) {
        base.to_string()
    } else {
        format!("{base}{suffix}")
    }
}

/// `{base}/chat/completions`, not duplicated when already present.
pub fn chat_completions_endpoint(base: &str) -> String {
    join_endpoint(base, "/chat/completions")
}

/// Like [`chat_completions_endpoint`] but keeps the base URL's query
/// string (Azure's `api-version`) after the appended path.
pub fn azure_endpoint(base: &str) -> String {
    match base.trim().split_once('?') {
        Some((path, query)) => format!("{}?{}", chat_completions_endpoint(path), query),
        None => chat_completions_endpoint(base),
    }
}

pub fn anthropic_endpoint(base: &str) -> String {
    join_endpoint(base, "/messages")
}

fn non_empty_content(content: Option<&str>, provider: &str) -> Result<String, LlmError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(LlmError::MissingContent {
            provider: provider.to_string(),
        }),
    }
}

fn chat_completions_body(model: &str, temperature: f32, system: &str, user: &str) -> Value {
    json!({
        "model": model,
        "temperature": temperature,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": system },
            { "role": "user", "content": user },
        ],
    })
}

/// `choices[0].message.content`.
pub fn extract_chat_content(body: &Value, provider: &str) -> Result<String, LlmError> {
    let content = body
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str);
    non_empty_content(content, provider)
}

/// `content[0].text`.
pub fn extract_anthropic_content(body: &Value, provider: &str) -> Result<String, LlmError> {
    let content = body.pointer("/content/0/text").and_then(Value::as_str);
    non_empty_content(content, provider)
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client, DeckError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DeckError::Internal(format!("failed to build HTTP client: {e}")))
}

async fn send(
    http: &reqwest::Client,
    provider: &str,
    request: ChatRequest,
) -> Result<Value, LlmError> {
    debug!("{}: POST {}", provider, request.url);
    let mut builder = http.post(&request.url).json(&request.body);
    for (name, value) in &request.headers {
        builder = builder.header(*name, value);
    }

    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            LlmError::Transport {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LlmError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
            body: truncate(body.trim(), STATUS_BODY_EXCERPT),
        });
    }

    response.json::<Value>().await.map_err(|e| LlmError::Transport {
        provider: provider.to_string(),
        detail: format!("response body is not JSON: {e}"),
    })
}

// ── OpenAI-compatible (OpenAI, DeepSeek, custom) ─────────────────────────

#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient {
    http: reqwest::Client,
    provider: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, DeckError> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            provider: provider.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }

    pub fn build_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            url: chat_completions_endpoint(&self.base_url),
            headers: vec![("Authorization", format!("Bearer {}", self.api_key))],
            body: chat_completions_body(&self.model, self.temperature, system, user),
        }
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiCompatibleClient {
    fn provider(&self) -> &str {
        &self.provider
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = send(&self.http, &self.provider, self.build_request(system, user)).await?;
        extract_chat_content(&body, &self.provider)
    }
}

// ── Azure OpenAI ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl AzureOpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Result<Self, DeckError> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        })
    }

    pub fn build_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            url: azure_endpoint(&self.base_url),
            headers: vec![("api-key", self.api_key.clone())],
            body: chat_completions_body(&self.model, self.temperature, system, user),
        }
    }
}

#[async_trait]
impl ChatCompletionClient for AzureOpenAiClient {
    fn provider(&self) -> &str {
        "azure"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = send(&self.http, self.provider(), self.build_request(system, user)).await?;
        extract_chat_content(&body, self.provider())
    }
}

// ── Anthropic Messages API ───────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Result<Self, DeckError> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
        })
    }

    pub fn build_request(&self, system: &str, user: &str) -> ChatRequest {
        ChatRequest {
            url: anthropic_endpoint(&self.base_url),
            headers: vec![
                ("x-api-key", self.api_key.clone()),
                ("anthropic-version", ANTHROPIC_VERSION.to_string()),
            ],
            body: json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "system": system,
                "messages": [{
                    "role": "user",
                    "content": [{ "type": "text", "text": user }],
                }],
            }),
        }
    }
}

#[async_trait]
impl ChatCompletionClient for AnthropicClient {
    fn provider(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let body = send(&self.http, self.provider(), self.build_request(system, user)).await?;
        extract_anthropic_content(&body, self.provider())
    }
}

// ── Factory ──────────────────────────────────────────────────────────────

/// Build the client for `settings.provider`.
pub fn client_for(settings: &LlmSettings) -> Result<Arc<dyn ChatCompletionClient>, DeckError> {
    settings.validate()?;
    let base_url = settings.resolved_base_url().unwrap_or_default();
    let api_key = settings.api_key.clone().unwrap_or_default().trim().to_string();
    let model = settings.resolved_model();

    let client: Arc<dyn ChatCompletionClient> = match settings.provider {
        ProviderKind::Anthropic => Arc::new(AnthropicClient::new(
            base_url,
            api_key,
            model,
            settings.max_tokens,
            settings.timeout_secs,
        )?),
        ProviderKind::Azure => Arc::new(AzureOpenAiClient::new(
            base_url,
            api_key,
            model,
            settings.temperature,
            settings.timeout_secs,
        )?),
        kind @ (ProviderKind::OpenAi | ProviderKind::DeepSeek | ProviderKind::Custom) => {
            Arc::new(OpenAiCompatibleClient::new(
                kind.as_str(),
                base_url,
                api_key,
                model,
                settings.temperature,
                settings.timeout_secs,
            )?)
        }
    };
    debug!("Using {} client", client.provider());
    Ok(client)
}
