use anyhow::{anyhow, bail, Result};
use candle_core::{Device, Tensor};
use std::path::Path;
use tokenizers::{Encoding, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

/// Loads `tokenizer.json` configured to pad each batch to its longest row and
/// truncate at `max_len`.
pub fn load_tokenizer(path: &Path, max_len: usize) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", path.display(), e))?;
    tokenizer.with_padding(Some(PaddingParams { strategy: PaddingStrategy::BatchLongest, ..Default::default() }));
    tokenizer
        .with_truncation(Some(TruncationParams { max_length: max_len, ..Default::default() }))
        .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
    Ok(tokenizer)
}

/// Input tensors for a padded batch.
pub struct BatchTensors {
    pub input_ids: Tensor,
    pub token_type_ids: Tensor,
    pub attention_mask: Tensor,
}

pub fn encodings_to_tensors(encodings: &[Encoding], device: &Device) -> Result<BatchTensors> {
    let rows = encodings.len();
    let cols = encodings.first().map_or(0, |e| e.get_ids().len());
    if encodings.iter().any(|e| e.get_ids().len() != cols) { bail!("batch is not padded to a common length"); }
    let gather = |f: fn(&Encoding) -> &[u32]| -> Vec<u32> { encodings.iter().flat_map(|e| f(e).iter().copied()).collect() };
    Ok(BatchTensors {
        input_ids: Tensor::from_vec(gather(Encoding::get_ids), (rows, cols), device)?,
        token_type_ids: Tensor::from_vec(gather(Encoding::get_type_ids), (rows, cols), device)?,
        attention_mask: Tensor::from_vec(gather(Encoding::get_attention_mask), (rows, cols), device)?,
    })
}
