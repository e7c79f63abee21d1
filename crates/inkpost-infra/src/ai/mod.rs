//! Text generation adapters for the writing assistant.

mod disabled;
#[cfg(feature = "ai")]
mod openai;

pub use disabled::DisabledTextGenerator;
#[cfg(feature = "ai")]
pub use openai::{OpenAiCompatibleGenerator, TextGeneratorConfig};
