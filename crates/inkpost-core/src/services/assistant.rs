//! Writing assistant built on an injected `TextGenerator`.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::ports::{GenerationError, TextGenerator};

const WRITER_PROMPT: &str =
    "You are a professional blog post writer. Return ONLY raw JSON - no markdown, no code fences.";
const EDITOR_PROMPT: &str =
    "You are a professional blog editor. Return ONLY raw JSON - no markdown, no code fences.";
const PING_PROMPT: &str = "You are a connectivity test assistant. Reply with exactly one word.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPost {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ImprovedContent {
    content: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub ok: bool,
    pub provider: String,
    pub model: String,
    pub duration_ms: u128,
    pub reply: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
}

/// Parse a JSON reply, tolerating markdown code fences around it.
fn parse_reply<T: for<'de> Deserialize<'de>>(text: &str) -> Result<T, GenerationError> {
    let clean = text.replace("```json", "").replace("```", "");
    serde_json::from_str(clean.trim()).map_err(|e| {
        tracing::warn!(error = %e, "Unparseable generator reply");
        GenerationError::InvalidResponse
    })
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, AssistantError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AssistantError::Validation(format!(
            "{} is required and cannot be empty.",
            what
        )))
    } else {
        Ok(trimmed)
    }
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Draft a title and HTML body about `topic`.
    pub async fn generate_post(&self, topic: &str) -> Result<GeneratedPost, AssistantError> {
        let topic = required(topic, "Topic")?;
        let prompt = format!(
            "Generate a catchy title and engaging HTML content for a blog post about: \"{}\".\n\
             Return a valid JSON object exactly like this:\n\
             {{\n  \"title\": \"Your Title Here\",\n  \"content\": \"<p>Your HTML content here...</p>\"\n}}",
            topic
        );

        let reply = self.generator.generate_text(WRITER_PROMPT, &prompt).await?;
        Ok(parse_reply(&reply)?)
    }

    /// Rewrite `content` following `instructions`.
    pub async fn improve_post(
        &self,
        content: &str,
        instructions: &str,
    ) -> Result<String, AssistantError> {
        let content = required(content, "Content")?;
        let instructions = required(instructions, "Instructions")?;
        let prompt = format!(
            "Improve the following blog post content based on these instructions: \"{}\".\n\n\
             Current Content:\n{}\n\n\
             Return a valid JSON object exactly like this:\n\
             {{\n  \"content\": \"<p>Your improved HTML content here...</p>\"\n}}",
            instructions, content
        );

        let reply = self.generator.generate_text(EDITOR_PROMPT, &prompt).await?;
        let improved: ImprovedContent = parse_reply(&reply)?;
        Ok(improved.content)
    }

    /// Round-trip a minimal prompt to confirm the provider answers.
    pub async fn test_connection(&self) -> Result<ConnectionReport, AssistantError> {
        let start = Instant::now();
        let reply = self
            .generator
            .generate_text(PING_PROMPT, "Reply with the single word \"OK\" and nothing else.")
            .await?;
        let info = self.generator.describe();

        Ok(ConnectionReport {
            ok: true,
            provider: info.provider,
            model: info.model,
            duration_ms: start.elapsed().as_millis(),
            reply: reply.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::GeneratorInfo;
    use async_trait::async_trait;

    enum CannedGenerator {
        Reply(&'static str),
        Unconfigured,
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate_text(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
            match self {
                CannedGenerator::Reply(text) => Ok(text.to_string()),
                CannedGenerator::Unconfigured => Err(GenerationError::NotConfigured),
            }
        }

        fn describe(&self) -> GeneratorInfo {
            GeneratorInfo {
                provider: "canned".to_string(),
                model: "fixed".to_string(),
            }
        }
    }

    fn assistant(generator: CannedGenerator) -> Assistant {
        Assistant::new(Arc::new(generator))
    }

    #[tokio::test]
    async fn test_generate_post_strips_code_fences() {
        let a = assistant(CannedGenerator::Reply(
            "```json\n{\"title\": \"T\", \"content\": \"<p>C</p>\"}\n```",
        ));
        let post = a.generate_post("rust").await.unwrap();
        assert_eq!(post.title, "T");
        assert_eq!(post.content, "<p>C</p>");
    }

    #[tokio::test]
    async fn test_generate_post_requires_topic() {
        let a = assistant(CannedGenerator::Reply("{}"));
        let err = a.generate_post("   ").await.unwrap_err();
        assert!(matches!(err, AssistantError::Validation(_)));
    }

    #[tokio::test]
    async fn test_improve_post_rejects_garbage_reply() {
        let a = assistant(CannedGenerator::Reply("sure, here you go"));
        let err = a.improve_post("<p>x</p>", "shorter").await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Generation(GenerationError::InvalidResponse)
        ));
    }

    #[tokio::test]
    async fn test_not_configured_propagates() {
        let a = assistant(CannedGenerator::Unconfigured);
        let err = a.test_connection().await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Generation(GenerationError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn test_connection_report() {
        let a = assistant(CannedGenerator::Reply(" OK \n"));
        let report = a.test_connection().await.unwrap();
        assert!(report.ok);
        assert_eq!(report.reply, "OK");
        assert_eq!(report.model, "fixed");
    }
}
