use anyhow::{bail, Result};

use docrag_core::traits::VectorIndex;
use docrag_core::{ChunkId, SearchHit};

/// Exact inner-product index over row-major vectors.
///
/// Scores are raw dot products, so for L2-normalised inputs they are cosine
/// similarities in [-1, 1]. Ties keep insertion order.
#[derive(Debug, Clone)]
pub struct FlatIpIndex {
    dim: usize,
    ids: Vec<ChunkId>,
    data: Vec<f32>,
}

impl FlatIpIndex {
    pub fn new(dim: usize) -> Self {
        Self { dim, ids: Vec::new(), data: Vec::new() }
    }

    pub fn from_embeddings(dim: usize, ids: Vec<ChunkId>, embeddings: &[Vec<f32>]) -> Result<Self> {
        if ids.len() != embeddings.len() {
            bail!("{} ids but {} embeddings", ids.len(), embeddings.len());
        }
        let mut index = Self::new(dim);
        for (id, v) in ids.into_iter().zip(embeddings) {
            index.add(id, v)?;
        }
        Ok(index)
    }

    pub fn add(&mut self, id: impl Into<ChunkId>, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            bail!("vector has dimension {}, index expects {}", vector.len(), self.dim);
        }
        self.ids.push(id.into());
        self.data.extend_from_slice(vector);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl VectorIndex for FlatIpIndex {
    fn name(&self) -> &str {
        "flat-ip"
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn search_vec(&self, query_vec: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        if query_vec.len() != self.dim {
            bail!("query has dimension {}, index expects {}", query_vec.len(), self.dim);
        }
        if self.dim == 0 || limit == 0 {
            return Ok(vec![]);
        }
        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dim)
            .map(|row| row.iter().zip(query_vec).map(|(a, b)| a * b).sum::<f32>())
            .enumerate()
            .collect();
        // stable sort keeps insertion order for equal scores
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);
        Ok(scored.into_iter().map(|(row, score)| SearchHit::new(self.ids[row].clone(), score)).collect())
    }
}
