use std::sync::Arc;

use docrag_core::traits::Reranker;
use docrag_core::{Candidate, Corpus, RetrievalError};
use tracing::debug;

/// Rescores a candidate pool with a cross-encoder. All pairs go to the
/// collaborator in a single batched call.
pub struct RerankStage {
    reranker: Arc<dyn Reranker>,
}

impl RerankStage {
    pub fn new(reranker: Arc<dyn Reranker>) -> Self {
        Self { reranker }
    }

    /// Candidates come back in input order, each carrying its relevance
    /// score in place of the fused one. Any failure, including a score
    /// count that does not match the pool or a NaN/infinite score, is a
    /// `RerankUnavailable`.
    pub fn rerank(&self, query: &str, pool: &[Candidate], corpus: &Corpus) -> Result<Vec<Candidate>, RetrievalError> {
        if pool.is_empty() {
            return Ok(Vec::new());
        }
        let name = self.reranker.name();
        let texts = pool
            .iter()
            .map(|c| {
                corpus
                    .get(&c.id)
                    .map(|chunk| chunk.content.as_str())
                    .ok_or_else(|| RetrievalError::rerank_unavailable(name, format!("chunk '{}' is not in the corpus", c.id)))
            })
            .collect::<Result<Vec<&str>, _>>()?;

        let scores = self
            .reranker
            .score_pairs(query, &texts)
            .map_err(|e| RetrievalError::rerank_unavailable(name, format!("{e:#}")))?;
        if scores.len() != pool.len() {
            return Err(RetrievalError::rerank_unavailable(
                name,
                format!("returned {} scores for {} candidates", scores.len(), pool.len()),
            ));
        }
        if let Some(i) = scores.iter().position(|s| !s.is_finite()) {
            return Err(RetrievalError::rerank_unavailable(
                name,
                format!("non-finite score {} for chunk '{}'", scores[i], pool[i].id),
            ));
        }
        debug!(reranker = name, candidates = pool.len(), "reranked pool");
        Ok(pool.iter().zip(scores).map(|(c, s)| c.rescored(s)).collect())
    }
}
