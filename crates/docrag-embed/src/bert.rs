use anyhow::{anyhow, Result};
use candle_core::Device;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use std::time::Instant;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use docrag_core::traits::Embedder;

use crate::device::select_device;
use crate::pool::masked_mean_l2;
use crate::tokenize::{encodings_to_tensors, load_tokenizer};
use crate::weights::ModelFiles;

const DEFAULT_MAX_LEN: usize = 256;

/// Sentence-transformers style BERT encoder (e.g. all-MiniLM-L6-v2):
/// masked mean pooling followed by L2 normalisation.
pub struct BertEmbedder { model: BertModel, tokenizer: Tokenizer, device: Device, dim: usize, name: String }

impl BertEmbedder {
    pub fn load(model_dir: &Path) -> Result<Self> {
        info!(dir = %model_dir.display(), "loading BERT embedding model");
        let files = ModelFiles::open(model_dir)?;
        let config: BertConfig = serde_json::from_str(&files.config_json)?;
        let dim = files.config_usize("hidden_size")?.ok_or_else(|| anyhow!("config.json lacks hidden_size"))?;
        let max_len = files.config_usize("max_position_embeddings")?.unwrap_or(DEFAULT_MAX_LEN).min(DEFAULT_MAX_LEN);
        let device = select_device();
        let tokenizer = load_tokenizer(&files.tokenizer_path(), max_len)?;
        let model = BertModel::load(files.var_builder(&device)?, &config)?;
        let name = format!("bert:{}", model_dir.file_name().map_or_else(|| "model".into(), |n| n.to_string_lossy()));
        info!(dim, max_len, "embedding model loaded");
        Ok(Self { model, tokenizer, device, dim, name })
    }
}

impl Embedder for BertEmbedder {
    fn name(&self) -> &str { &self.name }
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() { return Ok(vec![]); }
        let start = Instant::now();
        let encodings = self.tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let batch = encodings_to_tensors(&encodings, &self.device)?;
        let hidden = self.model.forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &batch.attention_mask)?;
        let vectors: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        debug!(batch = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "embedded batch");
        Ok(vectors)
    }
}
