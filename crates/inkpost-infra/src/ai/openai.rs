//! Client for OpenAI-compatible chat completion APIs (OpenRouter by default).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use inkpost_core::ports::{GenerationError, GeneratorInfo, TextGenerator};

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct TextGeneratorConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl TextGeneratorConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://openrouter.ai/api/v1";
    pub const DEFAULT_MODEL: &'static str = "meta-llama/llama-3.3-70b-instruct:free";

    /// Read `AI_API_KEY`, `AI_BASE_URL` and `AI_MODEL`.
    ///
    /// Returns `None` when no key is set, in which case the assistant runs
    /// with a disabled generator.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("AI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())?;

        Some(Self {
            api_key,
            base_url: std::env::var("AI_BASE_URL")
                .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string()),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(60),
        })
    }

    fn provider_name(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.base_url.clone())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// `TextGenerator` over `POST {base_url}/chat/completions`.
pub struct OpenAiCompatibleGenerator {
    client: reqwest::Client,
    config: TextGeneratorConfig,
}

impl OpenAiCompatibleGenerator {
    pub fn new(config: TextGeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        tracing::info!(model = %config.model, base_url = %config.base_url, "Text generator configured");

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

/// The provider's body stays in the logs; only the status travels on.
fn error_for_status(status: StatusCode, body: &str) -> GenerationError {
    tracing::warn!(%status, body = %body, "Text generation request failed");
    if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::QuotaExceeded
    } else {
        GenerationError::Api(format!("provider returned {status}"))
    }
}

fn first_reply(response: ChatResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::InvalidResponse)
}

#[async_trait]
impl TextGenerator for OpenAiCompatibleGenerator {
    #[tracing::instrument(skip_all, fields(model = %self.config.model))]
    async fn generate_text(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Api(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, &body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|_| GenerationError::InvalidResponse)?;

        first_reply(parsed)
    }

    fn describe(&self) -> GeneratorInfo {
        GeneratorInfo {
            provider: self.config.provider_name(),
            model: self.config.model.clone(),
        }
    }
}
