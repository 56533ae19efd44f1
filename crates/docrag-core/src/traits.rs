//! Collaborator seams. The engine only sees these traits; concrete backends
//! live in `docrag-text`, `docrag-vector` and `docrag-embed`.
//!
//! All collaborators are read-only during retrieval and must tolerate
//! concurrent calls from several queries.

use crate::types::SearchHit;

pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    /// Returns one L2-normalised vector of length `dim()` per input text.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

pub trait LexicalIndex: Send + Sync {
    fn name(&self) -> &str;
    /// Ranked hits for the raw query text, at most `limit` of them.
    fn search(&self, query: &str, limit: usize) -> anyhow::Result<Vec<SearchHit>>;
}

pub trait VectorIndex: Send + Sync {
    fn name(&self) -> &str;
    fn dim(&self) -> usize;
    /// Inner-product nearest neighbours of `query_vec`, at most `limit` of them.
    fn search_vec(&self, query_vec: &[f32], limit: usize) -> anyhow::Result<Vec<SearchHit>>;
}

pub trait Reranker: Send + Sync {
    fn name(&self) -> &str;
    /// Scores every `(query, text)` pair in a single call. The output is
    /// aligned with `texts` by index.
    fn score_pairs(&self, query: &str, texts: &[&str]) -> anyhow::Result<Vec<f32>>;
}
