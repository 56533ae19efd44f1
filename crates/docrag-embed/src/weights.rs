use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Files of a Hugging Face style model directory.
pub struct ModelFiles {
    pub dir: PathBuf,
    pub config_json: String,
}

impl ModelFiles {
    pub fn open(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.json");
        let config_json = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Ok(Self { dir: dir.to_path_buf(), config_json })
    }

    pub fn tokenizer_path(&self) -> PathBuf {
        self.dir.join("tokenizer.json")
    }

    /// Reads a numeric field such as `hidden_size` from `config.json`.
    pub fn config_usize(&self, key: &str) -> Result<Option<usize>> {
        let value: serde_json::Value = serde_json::from_str(&self.config_json)?;
        Ok(value.get(key).and_then(serde_json::Value::as_u64).and_then(|v| usize::try_from(v).ok()))
    }

    /// Prefers `model.safetensors`, falls back to `pytorch_model.bin`.
    pub fn var_builder(&self, device: &Device) -> Result<VarBuilder<'static>> {
        let safetensors = self.dir.join("model.safetensors");
        let weights_map: HashMap<String, Tensor> = if safetensors.exists() {
            info!(path = %safetensors.display(), "loading safetensors weights");
            candle_core::safetensors::load(&safetensors, device)?
        } else {
            let pickle = self.dir.join("pytorch_model.bin");
            info!(path = %pickle.display(), "loading pickled weights");
            candle_core::pickle::read_all(&pickle)
                .map_err(|e| anyhow!("Failed to read weights from {}: {}", pickle.display(), e))?
                .into_iter()
                .collect()
        };
        Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
    }
}
