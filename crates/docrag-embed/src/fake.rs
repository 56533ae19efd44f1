use anyhow::Result;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use twox_hash::XxHash64;

use docrag_core::traits::{Embedder, Reranker};

/// Deterministic hashed bag-of-words embedder for tests and offline runs.
pub struct FakeEmbedder { dim: usize }

impl FakeEmbedder { pub fn new(dim: usize) -> Self { Self { dim } } }

impl FakeEmbedder {
    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() { let mut hasher = XxHash64::with_seed(0); token.to_lowercase().hash(&mut hasher); let h = hasher.finish(); let idx = (h as usize) % self.dim; let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32); v[idx] += val + (i as f32 % 3.0) * 0.01; }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6); for x in &mut v { *x /= norm; } v
    }
}

impl Embedder for FakeEmbedder {
    fn name(&self) -> &str { "fake" }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}

/// Deterministic reranker: the share of distinct query terms found in the text.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlapReranker;

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).map(str::to_lowercase).collect()
}

impl Reranker for OverlapReranker {
    fn name(&self) -> &str { "overlap" }

    fn score_pairs(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        let query_terms = terms(query);
        if query_terms.is_empty() { return Ok(vec![0.0; texts.len()]); }
        Ok(texts.iter().map(|t| { let doc = terms(t); query_terms.iter().filter(|q| doc.contains(*q)).count() as f32 / query_terms.len() as f32 }).collect())
    }
}
