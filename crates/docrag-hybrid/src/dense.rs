use std::sync::Arc;

use docrag_core::traits::VectorIndex;
use docrag_core::{RetrievalError, ScoreMap, Stage};

use crate::lexical::hits_to_scores;

/// Wraps the vector index. Expects an already normalised query embedding.
pub struct DenseScorer {
    index: Arc<dyn VectorIndex>,
}

impl DenseScorer {
    pub fn new(index: Arc<dyn VectorIndex>) -> Self {
        Self { index }
    }

    pub fn collaborator(&self) -> &str {
        self.index.name()
    }

    pub fn dim(&self) -> usize {
        self.index.dim()
    }

    pub fn score_dense(&self, query_embedding: &[f32], limit: usize) -> Result<ScoreMap, RetrievalError> {
        if limit == 0 {
            return Err(RetrievalError::InvalidArgument("dense limit must be positive".into()));
        }
        let expected = self.index.dim();
        if query_embedding.len() != expected {
            return Err(RetrievalError::DimensionMismatch { expected, actual: query_embedding.len() });
        }
        let hits = self
            .index
            .search_vec(query_embedding, limit)
            .map_err(|e| RetrievalError::index_unavailable(Stage::Dense, self.index.name(), format!("{e:#}")))?;
        Ok(hits_to_scores(hits, limit))
    }
}
