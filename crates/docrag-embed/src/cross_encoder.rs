use anyhow::{anyhow, Result};
use candle_core::{Device, IndexOp, Module};
use candle_nn::{linear, Linear};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use std::time::Instant;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use docrag_core::traits::Reranker;

use crate::device::select_device;
use crate::tokenize::{encodings_to_tensors, load_tokenizer};
use crate::weights::ModelFiles;

const MAX_PAIR_LEN: usize = 512;

/// BERT sequence-classification cross-encoder with a single relevance logit
/// (e.g. ms-marco-MiniLM-L-6-v2). Scores are passed through a sigmoid, so
/// they land in (0, 1).
pub struct CrossEncoderReranker { bert: BertModel, pooler: Linear, classifier: Linear, tokenizer: Tokenizer, device: Device, name: String }

impl CrossEncoderReranker {
    pub fn load(model_dir: &Path) -> Result<Self> {
        info!(dir = %model_dir.display(), "loading cross-encoder reranker");
        let files = ModelFiles::open(model_dir)?;
        let config: BertConfig = serde_json::from_str(&files.config_json)?;
        let hidden = files.config_usize("hidden_size")?.ok_or_else(|| anyhow!("config.json lacks hidden_size"))?;
        let max_len = files.config_usize("max_position_embeddings")?.unwrap_or(MAX_PAIR_LEN).min(MAX_PAIR_LEN);
        let device = select_device();
        let tokenizer = load_tokenizer(&files.tokenizer_path(), max_len)?;
        let vb = files.var_builder(&device)?;
        let bert = BertModel::load(vb.clone(), &config)?;
        let pooler = linear(hidden, hidden, vb.pp("bert.pooler.dense"))?;
        let classifier = linear(hidden, 1, vb.pp("classifier"))?;
        let name = format!("cross-encoder:{}", model_dir.file_name().map_or_else(|| "model".into(), |n| n.to_string_lossy()));
        Ok(Self { bert, pooler, classifier, tokenizer, device, name })
    }
}

impl Reranker for CrossEncoderReranker {
    fn name(&self) -> &str { &self.name }

    fn score_pairs(&self, query: &str, texts: &[&str]) -> Result<Vec<f32>> {
        if texts.is_empty() { return Ok(vec![]); }
        let start = Instant::now();
        let pairs: Vec<(String, String)> = texts.iter().map(|t| (query.to_string(), (*t).to_string())).collect();
        let encodings = self.tokenizer.encode_batch(pairs, true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let batch = encodings_to_tensors(&encodings, &self.device)?;
        let hidden = self.bert.forward(&batch.input_ids, &batch.token_type_ids, Some(&batch.attention_mask))?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pooler.forward(&cls)?.tanh()?;
        let logits = self.classifier.forward(&pooled)?.squeeze(1)?;
        let scores: Vec<f32> = candle_nn::ops::sigmoid(&logits)?.to_device(&Device::Cpu)?.to_vec1()?;
        debug!(pairs = texts.len(), elapsed_ms = start.elapsed().as_millis() as u64, "scored rerank batch");
        Ok(scores)
    }
}
