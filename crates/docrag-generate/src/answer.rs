use anyhow::Result;
use serde::Serialize;
use tracing::info;

use docrag_core::{RetrievalRequest, RetrievalResult};
use docrag_hybrid::RetrievalEngine;

use crate::prompt::build_prompt;
use crate::{GenerationParams, Generator};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub contexts: Vec<RetrievalResult>,
}

/// Retrieve, prompt, generate. Retrieval errors abort before the generator
/// is started.
pub fn answer(
    engine: &RetrievalEngine,
    generator: &dyn Generator,
    request: &RetrievalRequest,
    params: &GenerationParams,
) -> Result<Answer> {
    let contexts = engine.retrieve(request)?;
    let prompt = build_prompt(&request.query, &contexts);
    info!(contexts = contexts.len(), generator = generator.name(), "generating answer");
    let text = generator.generate(&prompt, params)?;
    Ok(Answer { text, contexts })
}
