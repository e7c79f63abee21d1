//! Text generation port - an injected capability, never a global client.

use async_trait::async_trait;

/// Chat-style text generator (any OpenAI-compatible provider).
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` under the given system instructions.
    async fn generate_text(&self, system: &str, prompt: &str) -> Result<String, GenerationError>;

    /// Human-readable provider and model, for diagnostics.
    fn describe(&self) -> GeneratorInfo;
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GeneratorInfo {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("AI service is not configured. Please set AI_API_KEY in your environment.")]
    NotConfigured,

    #[error("AI quota exceeded. Please try again later.")]
    QuotaExceeded,

    #[error("AI API error: {0}")]
    Api(String),

    #[error("AI returned an invalid response. Please try again.")]
    InvalidResponse,
}
