//! In-memory chunk store, loaded once and read for the engine's lifetime.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{Chunk, ChunkId};

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    chunks: HashMap<ChunkId, Chunk>,
}

impl Corpus {
    /// Builds a corpus, rejecting duplicate ids.
    pub fn from_chunks(chunks: impl IntoIterator<Item = Chunk>) -> Result<Self> {
        let mut map = HashMap::new();
        for chunk in chunks {
            if map.contains_key(&chunk.id) {
                bail!("duplicate chunk id '{}'", chunk.id);
            }
            map.insert(chunk.id.clone(), chunk);
        }
        Ok(Self { chunks: map })
    }

    /// Reads a `chunks.json` array.
    pub fn load_json(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read chunks file {}", path.display()))?;
        let chunks: Vec<Chunk> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse chunks file {}", path.display()))?;
        let corpus = Self::from_chunks(chunks)
            .with_context(|| format!("Invalid chunks file {}", path.display()))?;
        info!(chunks = corpus.len(), path = %path.display(), "loaded corpus");
        Ok(corpus)
    }

    /// Writes chunks as a pretty-printed JSON array, sorted by id.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut chunks: Vec<&Chunk> = self.chunks.values().collect();
        chunks.sort_by(|a, b| a.id.cmp(&b.id));
        fs::write(path, serde_json::to_string_pretty(&chunks)?)
            .with_context(|| format!("Failed to write chunks file {}", path.display()))?;
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Chunk> {
        self.chunks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.chunks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
