//! docrag-generate
//!
//! Turns retrieved contexts into an extraction prompt and hands it to a
//! local text-generation process.

pub mod answer;
pub mod llama;
pub mod prompt;

use anyhow::Result;
use docrag_core::config::GenerationSettings;

pub use answer::{answer, Answer};
pub use llama::LlamaCliGenerator;
pub use prompt::build_prompt;

/// Sampling knobs passed through to the generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: usize,
    pub threads: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::from_settings(&GenerationSettings::default())
    }
}

impl GenerationParams {
    /// Unset `threads` means every available core.
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        let threads = settings
            .threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1));
        Self { temperature: settings.temperature, top_p: settings.top_p, max_tokens: settings.max_tokens, threads }
    }
}

pub trait Generator: Send + Sync {
    fn name(&self) -> &str;
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String>;
}
