#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use docrag_core::config::RetrievalSettings;
use docrag_core::traits::{Embedder, LexicalIndex, Reranker, VectorIndex};
use docrag_core::{Chunk, Corpus, SearchHit};
use docrag_hybrid::RetrievalEngine;

pub const DIM: usize = 4;

pub fn chunk(id: &str, path: &str, content: &str) -> Chunk {
    Chunk { id: id.into(), source_path: path.into(), content: content.into(), position_index: 0 }
}

/// Returns canned hits, best first, and counts calls.
pub struct CannedLexical {
    hits: Vec<SearchHit>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl CannedLexical {
    pub fn new(scores: &[(&str, f32)]) -> Arc<Self> {
        Arc::new(Self { hits: ranked(scores), fail: false, calls: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { hits: vec![], fail: true, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LexicalIndex for CannedLexical {
    fn name(&self) -> &str {
        "canned-lexical"
    }

    fn search(&self, _query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("lexical index is offline"));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

pub struct CannedVector {
    hits: Vec<SearchHit>,
    dim: usize,
    fail: bool,
    pub calls: AtomicUsize,
}

impl CannedVector {
    pub fn new(scores: &[(&str, f32)]) -> Arc<Self> {
        Arc::new(Self { hits: ranked(scores), dim: DIM, fail: false, calls: AtomicUsize::new(0) })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { hits: vec![], dim: DIM, fail: true, calls: AtomicUsize::new(0) })
    }

    pub fn with_dim(dim: usize) -> Arc<Self> {
        Arc::new(Self { hits: vec![], dim, fail: false, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VectorIndex for CannedVector {
    fn name(&self) -> &str {
        "canned-vector"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn search_vec(&self, _query_vec: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(anyhow!("vector index is offline"));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}

/// Emits a unit vector of a fixed dimension for any text. `reported_dim`
/// lets a test lie about the dimension to trigger a mismatch.
pub struct UnitEmbedder {
    reported_dim: usize,
    actual_dim: usize,
    pub calls: AtomicUsize,
}

impl UnitEmbedder {
    pub fn new() -> Arc<Self> {
        Self::lying(DIM, DIM)
    }

    pub fn lying(reported_dim: usize, actual_dim: usize) -> Arc<Self> {
        Arc::new(Self { reported_dim, actual_dim, calls: AtomicUsize::new(0) })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for UnitEmbedder {
    fn name(&self) -> &str {
        "unit"
    }

    fn dim(&self) -> usize {
        self.reported_dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut v = vec![0.0; self.actual_dim];
        if let Some(first) = v.first_mut() {
            *first = 1.0;
        }
        Ok(texts.iter().map(|_| v.clone()).collect())
    }
}

/// Scores each text by a lookup table keyed on content; unknown text
/// scores zero. Other modes ignore content: they fail, return the wrong
/// number of scores, score by batch position, or emit one fixed value.
pub struct TableReranker {
    by_content: HashMap<String, f32>,
    mode: RerankMode,
    pub calls: AtomicUsize,
    pub last_batch: AtomicUsize,
}

#[derive(Clone, Copy, PartialEq)]
pub enum RerankMode {
    Normal,
    Fail,
    ShortOutput,
    Positional,
    Constant(f32),
}

impl TableReranker {
    pub fn new(scores: &[(&str, f32)]) -> Arc<Self> {
        Self::with_mode(scores, RerankMode::Normal)
    }

    pub fn with_mode(scores: &[(&str, f32)], mode: RerankMode) -> Arc<Self> {
        Arc::new(Self {
            by_content: scores.iter().map(|(c, s)| (c.to_string(), *s)).collect(),
            mode,
            calls: AtomicUsize::new(0),
            last_batch: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Reranker for TableReranker {
    fn name(&self) -> &str {
        "table"
    }

    fn score_pairs(&self, _query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_batch.store(texts.len(), Ordering::SeqCst);
        match self.mode {
            RerankMode::Fail => Err(anyhow!("cross-encoder weights missing")),
            RerankMode::ShortOutput => Ok(vec![0.5; texts.len().saturating_sub(1)]),
            RerankMode::Positional => Ok((0..texts.len()).map(|i| i as f32).collect()),
            RerankMode::Constant(score) => Ok(vec![score; texts.len()]),
            RerankMode::Normal => Ok(texts.iter().map(|t| self.by_content.get(*t).copied().unwrap_or(0.0)).collect()),
        }
    }
}

pub struct Fixture {
    pub lexical: Arc<CannedLexical>,
    pub vector: Arc<CannedVector>,
    pub embedder: Arc<UnitEmbedder>,
}

impl Fixture {
    pub fn new(lexical: Arc<CannedLexical>, vector: Arc<CannedVector>) -> Self {
        Self { lexical, vector, embedder: UnitEmbedder::new() }
    }

    pub fn engine(&self, chunks: Vec<Chunk>, settings: RetrievalSettings) -> RetrievalEngine {
        let corpus = Arc::new(Corpus::from_chunks(chunks).expect("corpus"));
        RetrievalEngine::new(corpus, self.lexical.clone(), self.vector.clone(), self.embedder.clone(), settings)
            .expect("engine")
    }
}

fn ranked(scores: &[(&str, f32)]) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = scores.iter().map(|(id, s)| SearchHit::new(*id, *s)).collect();
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}

/// Counts query-term occurrences per chunk. Enough lexical signal for
/// end-to-end runs without a tantivy index on disk.
pub struct TermCountLexical {
    chunks: Vec<Chunk>,
}

impl TermCountLexical {
    pub fn new(chunks: &[Chunk]) -> Arc<Self> {
        Arc::new(Self { chunks: chunks.to_vec() })
    }
}

impl LexicalIndex for TermCountLexical {
    fn name(&self) -> &str {
        "term-count"
    }

    fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let scores: Vec<(&str, f32)> = self
            .chunks
            .iter()
            .map(|c| {
                let text = c.content.to_lowercase();
                (c.id.as_str(), terms.iter().map(|t| text.matches(t.as_str()).count()).sum::<usize>() as f32)
            })
            .filter(|(_, s)| *s > 0.0)
            .collect();
        Ok(ranked(&scores).into_iter().take(limit).collect())
    }
}
