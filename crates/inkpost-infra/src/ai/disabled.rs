use async_trait::async_trait;

use inkpost_core::ports::{GenerationError, GeneratorInfo, TextGenerator};

/// Stand-in used when no provider key is configured. Every call fails
/// with `NotConfigured`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledTextGenerator;

#[async_trait]
impl TextGenerator for DisabledTextGenerator {
    async fn generate_text(&self, _system: &str, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::NotConfigured)
    }

    fn describe(&self) -> GeneratorInfo {
        GeneratorInfo {
            provider: "none".to_string(),
            model: "none".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_generator_reports_not_configured() {
        let result = DisabledTextGenerator.generate_text("system", "prompt").await;
        assert!(matches!(result, Err(GenerationError::NotConfigured)));
        assert_eq!(DisabledTextGenerator.describe().provider, "none");
    }
}
