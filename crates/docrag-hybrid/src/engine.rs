use std::sync::Arc;
use std::thread;

use docrag_core::config::RetrievalSettings;
use docrag_core::traits::{Embedder, LexicalIndex, Reranker, VectorIndex};
use docrag_core::{Candidate, Corpus, RetrievalError, RetrievalRequest, RetrievalResult, ScoreMap, Stage};
use tracing::{debug, info_span, warn};

use crate::boost::HeuristicBoost;
use crate::dense::DenseScorer;
use crate::fusion::fuse_with;
use crate::lexical::LexicalScorer;
use crate::pool::{select_pool, sort_candidates};
use crate::rerank::RerankStage;

/// Query-time orchestrator. Holds the corpus and every collaborator; one
/// instance serves any number of concurrent `retrieve` calls.
pub struct RetrievalEngine {
    corpus: Arc<Corpus>,
    lexical: LexicalScorer,
    dense: DenseScorer,
    embedder: Arc<dyn Embedder>,
    reranker: Option<RerankStage>,
    boost: HeuristicBoost,
    settings: RetrievalSettings,
}

impl RetrievalEngine {
    /// Fails when the settings are out of range or the embedder and vector
    /// index disagree on dimensionality.
    pub fn new(
        corpus: Arc<Corpus>,
        lexical: Arc<dyn LexicalIndex>,
        vector: Arc<dyn VectorIndex>,
        embedder: Arc<dyn Embedder>,
        settings: RetrievalSettings,
    ) -> Result<Self, RetrievalError> {
        settings.validate().map_err(|e| RetrievalError::InvalidArgument(format!("{e:#}")))?;
        if embedder.dim() != vector.dim() {
            return Err(RetrievalError::DimensionMismatch { expected: vector.dim(), actual: embedder.dim() });
        }
        Ok(Self {
            corpus,
            lexical: LexicalScorer::new(lexical),
            dense: DenseScorer::new(vector),
            embedder,
            reranker: None,
            boost: HeuristicBoost::from_settings(&settings.boost),
            settings,
        })
    }

    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(RerankStage::new(reranker));
        self
    }

    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// A request carrying the configured defaults.
    pub fn request(&self, query: impl Into<String>) -> RetrievalRequest {
        RetrievalRequest::new(query)
            .with_top_k(self.settings.top_k)
            .with_alpha(self.settings.alpha)
            .with_pool_size(self.settings.pool_size)
    }

    /// Runs the full pipeline and returns at most `top_k` results, best first.
    ///
    /// Both adapters run concurrently. One failing adapter fails the call
    /// with `IndexUnavailable`; both failing gives `RetrievalUnavailable`.
    /// A reranker failure is never surfaced: the boosted pool order is used
    /// instead.
    pub fn retrieve(&self, request: &RetrievalRequest) -> Result<Vec<RetrievalResult>, RetrievalError> {
        request.validate()?;
        let span = info_span!("retrieve", top_k = request.top_k, alpha = request.alpha, pool_size = request.pool_size);
        let _enter = span.enter();

        let lexical_limit = self.settings.lexical_limit.unwrap_or(request.top_k);
        let dense_limit = self.settings.dense_limit.unwrap_or(request.top_k);

        let (lexical, dense) = thread::scope(|s| {
            let dense = s.spawn(|| self.dense_scores(&request.query, dense_limit));
            let lexical = self.lexical.score_lexical(&request.query, lexical_limit);
            let dense = dense.join().unwrap_or_else(|_| {
                Err(RetrievalError::index_unavailable(Stage::Dense, self.dense.collaborator(), "dense worker panicked"))
            });
            (lexical, dense)
        });
        let (lexical, dense) = combine(lexical, dense)?;
        debug!(lexical = lexical.len(), dense = dense.len(), "adapter scores");

        let mut fused = fuse_with(&lexical, &dense, request.alpha, self.settings.normalization);
        fused.retain(|id, _| {
            let known = self.corpus.contains(id);
            if !known {
                warn!(chunk_id = %id, "index returned a chunk missing from the corpus; dropping it");
            }
            known
        });

        let boosted = self.boost.apply(&fused, &self.corpus);
        let pool = select_pool(boosted.as_map(), request.pool_size);
        debug!(fused = fused.len(), pool = pool.len(), "candidate pool selected");

        let mut ranked = self.rerank_or_keep(&request.query, pool);
        ranked.truncate(request.top_k);

        Ok(ranked
            .iter()
            .filter_map(|c| self.corpus.get(&c.id).map(|chunk| RetrievalResult::from_chunk(chunk, c.score)))
            .collect())
    }

    fn dense_scores(&self, query: &str, limit: usize) -> Result<ScoreMap, RetrievalError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::InvalidArgument("query must not be empty".into()));
        }
        let name = self.embedder.name();
        let mut vectors = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| RetrievalError::index_unavailable(Stage::Dense, name, format!("{e:#}")))?;
        if vectors.is_empty() {
            return Err(RetrievalError::index_unavailable(Stage::Dense, name, "embedder returned no vector"));
        }
        let query_vec = vectors.swap_remove(0);
        self.dense.score_dense(&query_vec, limit)
    }

    fn rerank_or_keep(&self, query: &str, pool: Vec<Candidate>) -> Vec<Candidate> {
        let stage = match &self.reranker {
            Some(stage) if self.settings.rerank => stage,
            _ => return pool,
        };
        match stage.rerank(query, &pool, &self.corpus) {
            Ok(mut reranked) => {
                sort_candidates(&mut reranked);
                reranked
            }
            Err(err) => {
                warn!(error = %err, "reranking failed; keeping boosted order");
                pool
            }
        }
    }
}

/// Merges the two adapter outcomes. Dimension mismatches always surface
/// as-is since they point at a broken deployment, not a flaky collaborator.
fn combine(
    lexical: Result<ScoreMap, RetrievalError>,
    dense: Result<ScoreMap, RetrievalError>,
) -> Result<(ScoreMap, ScoreMap), RetrievalError> {
    match (lexical, dense) {
        (Ok(l), Ok(d)) => Ok((l, d)),
        (_, Err(e @ RetrievalError::DimensionMismatch { .. })) => Err(e),
        (Err(e @ RetrievalError::InvalidArgument(_)), _) | (_, Err(e @ RetrievalError::InvalidArgument(_))) => Err(e),
        (Err(l), Err(d)) => Err(RetrievalError::RetrievalUnavailable { lexical: l.to_string(), dense: d.to_string() }),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
    }
}
