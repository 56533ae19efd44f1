use std::sync::Arc;

use docrag_core::traits::LexicalIndex;
use docrag_core::{RetrievalError, ScoreMap, SearchHit, Stage};

/// Wraps the lexical index and turns its hits into a [`ScoreMap`].
pub struct LexicalScorer {
    index: Arc<dyn LexicalIndex>,
}

impl LexicalScorer {
    pub fn new(index: Arc<dyn LexicalIndex>) -> Self {
        Self { index }
    }

    /// Raw text goes to the index untouched. At most `limit` ids come back.
    pub fn score_lexical(&self, query: &str, limit: usize) -> Result<ScoreMap, RetrievalError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument("query must not be empty".into()));
        }
        let hits = self
            .index
            .search(query, limit)
            .map_err(|e| RetrievalError::index_unavailable(Stage::Lexical, self.index.name(), format!("{e:#}")))?;
        Ok(hits_to_scores(hits, limit))
    }
}

/// Keeps the first score seen for each id, in collaborator rank order.
pub(crate) fn hits_to_scores(hits: Vec<SearchHit>, limit: usize) -> ScoreMap {
    let mut scores = ScoreMap::with_capacity(hits.len().min(limit));
    for hit in hits.into_iter().take(limit) {
        scores.entry(hit.id).or_insert(hit.score);
    }
    scores
}
