//! Domain types shared by the retrieval engine and its collaborators.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::RetrievalError;

pub type ChunkId = String;

/// Per-collaborator scores keyed by chunk id. Scales differ between
/// producers; nothing downstream may assume a shared range or sign.
pub type ScoreMap = HashMap<ChunkId, f32>;

pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_ALPHA: f32 = 0.7;
pub const DEFAULT_POOL_SIZE: usize = 20;

/// An immutable window of source text, the unit of retrieval.
///
/// - `id`: stable identifier, unique across the corpus
/// - `source_path`: file the window was cut from, relative to the docs root
/// - `content`: the text payload
/// - `position_index`: order of the window within its source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    #[serde(alias = "source_file")]
    pub source_path: String,
    pub content: String,
    #[serde(alias = "chunk_index", default)]
    pub position_index: usize,
}

/// A raw hit returned by an index collaborator. Higher is better, but the
/// scale is collaborator-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub score: f32,
}

impl SearchHit {
    pub fn new(id: impl Into<ChunkId>, score: f32) -> Self {
        Self { id: id.into(), score }
    }
}

/// A chunk id travelling through the ranking stages. The id never changes;
/// each stage produces a new candidate with its own score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: ChunkId,
    pub score: f32,
}

impl Candidate {
    pub fn new(id: impl Into<ChunkId>, score: f32) -> Self {
        Self { id: id.into(), score }
    }

    /// Same chunk, different score.
    #[must_use]
    pub fn rescored(&self, score: f32) -> Self {
        Self { id: self.id.clone(), score }
    }
}

/// What the engine hands back to callers. Built once from a [`Chunk`] and
/// its final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub id: ChunkId,
    pub source_path: String,
    pub content: String,
    pub score: f32,
}

impl RetrievalResult {
    pub fn from_chunk(chunk: &Chunk, score: f32) -> Self {
        Self {
            id: chunk.id.clone(),
            source_path: chunk.source_path.clone(),
            content: chunk.content.clone(),
            score,
        }
    }
}

/// Per-call retrieval parameters.
///
/// `alpha` weights the dense signal; `1 - alpha` weights the lexical one.
/// `pool_size` bounds how many candidates reach the reranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub query: String,
    pub top_k: usize,
    pub alpha: f32,
    pub pool_size: usize,
}

impl RetrievalRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            alpha: DEFAULT_ALPHA,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    #[must_use]
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    /// Rejects requests that must never reach a collaborator.
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument("query must not be empty".into()));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(RetrievalError::InvalidArgument(format!(
                "alpha must be within [0, 1], got {}",
                self.alpha
            )));
        }
        if self.top_k == 0 {
            return Err(RetrievalError::InvalidArgument("top_k must be positive".into()));
        }
        if self.pool_size == 0 {
            return Err(RetrievalError::InvalidArgument("pool_size must be positive".into()));
        }
        Ok(())
    }
}
