//! Configuration loader, typed settings sections and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_RETRIEVAL__ALPHA=0.5`). Every
//! section has serde defaults so a missing file still yields a usable config.
use anyhow::{bail, Context};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::types::{DEFAULT_ALPHA, DEFAULT_POOL_SIZE, DEFAULT_TOP_K};

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(base_dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from an inline TOML document, without env overrides.
    pub fn from_toml_str(toml: &str, base_dir: &Path) -> anyhow::Result<Self> {
        let config = Self {
            figment: Figment::new().merge(Toml::string(toml)),
            base_dir: base_dir.to_path_buf(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like [`Config::get`] but falls back to `T::default()` when the whole
    /// section is absent.
    pub fn section<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if self.figment.find_value(key).is_err() {
            return Ok(T::default());
        }
        self.get(key)
    }

    pub fn retrieval(&self) -> anyhow::Result<RetrievalSettings> {
        self.section("retrieval")
    }

    pub fn data(&self) -> anyhow::Result<DataSettings> {
        self.section("data")
    }

    pub fn models(&self) -> anyhow::Result<ModelSettings> {
        self.section("models")
    }

    pub fn chunking(&self) -> anyhow::Result<ChunkingSettings> {
        self.section("chunking")
    }

    pub fn generation(&self) -> anyhow::Result<GenerationSettings> {
        self.section("generation")
    }

    /// Expands and resolves a configured path against the config base dir.
    pub fn resolve_path<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.retrieval().context("invalid [retrieval] section")?.validate()?;
        self.chunking().context("invalid [chunking] section")?.validate()?;
        Ok(())
    }
}

/// How lexical and dense score maps are brought together before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Raw weighted sum of native scores.
    #[default]
    None,
    /// Rescale each map to [0, 1] independently before weighting.
    MinMax,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub alpha: f32,
    pub pool_size: usize,
    /// Hits requested from the lexical index; defaults to the request's `top_k`.
    pub lexical_limit: Option<usize>,
    /// Hits requested from the vector index; defaults to the request's `top_k`.
    pub dense_limit: Option<usize>,
    pub normalization: Normalization,
    pub rerank: bool,
    pub boost: BoostSettings,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            alpha: DEFAULT_ALPHA,
            pool_size: DEFAULT_POOL_SIZE,
            lexical_limit: None,
            dense_limit: None,
            normalization: Normalization::None,
            rerank: true,
            boost: BoostSettings::default(),
        }
    }
}

impl RetrievalSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            bail!("retrieval.alpha must be within [0, 1], got {}", self.alpha);
        }
        if self.top_k == 0 || self.pool_size == 0 {
            bail!("retrieval.top_k and retrieval.pool_size must be positive");
        }
        if self.lexical_limit == Some(0) || self.dense_limit == Some(0) {
            bail!("retrieval.lexical_limit and retrieval.dense_limit must be positive when set");
        }
        if !self.boost.path_bonus.is_finite() || !self.boost.code_fence_bonus.is_finite() {
            bail!("retrieval.boost bonuses must be finite");
        }
        if self.boost.code_fence_marker.is_empty() {
            bail!("retrieval.boost.code_fence_marker must not be empty");
        }
        Ok(())
    }
}

pub const DEFAULT_PATH_KEYWORDS: [&str; 7] = [
    "tokenizer",
    "quickstart",
    "getting_started",
    "quicktour",
    "tutorial",
    "usage",
    "installation",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostSettings {
    pub path_keywords: Vec<String>,
    pub path_bonus: f32,
    pub code_fence_bonus: f32,
    pub code_fence_marker: String,
}

impl Default for BoostSettings {
    fn default() -> Self {
        Self {
            path_keywords: DEFAULT_PATH_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            path_bonus: 2.0,
            code_fence_bonus: 1.0,
            code_fence_marker: "```".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub docs_dir: String,
    pub chunks_file: String,
    pub tantivy_index_dir: String,
    pub lancedb_dir: String,
    pub table_name: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            docs_dir: "data/raw_docs".to_string(),
            chunks_file: "data/processed_chunks/chunks.json".to_string(),
            tantivy_index_dir: "index/tantivy".to_string(),
            lancedb_dir: "index/lancedb".to_string(),
            table_name: "chunks".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub embed_model_dir: String,
    pub rerank_model_dir: String,
    /// Use the deterministic fake embedder and reranker instead of weights.
    pub use_fake: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            embed_model_dir: "models/all-MiniLM-L6-v2".to_string(),
            rerank_model_dir: "models/ms-marco-MiniLM-L-6-v2".to_string(),
            use_fake: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_words: usize,
    pub overlap_words: usize,
    /// Documents whose cleaned text is shorter than this are skipped.
    pub min_chars: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { chunk_words: 500, overlap_words: 50, min_chars: 50 }
    }
}

impl ChunkingSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk_words == 0 {
            bail!("chunking.chunk_words must be positive");
        }
        if self.overlap_words >= self.chunk_words {
            bail!(
                "chunking.overlap_words ({}) must be smaller than chunking.chunk_words ({})",
                self.overlap_words,
                self.chunk_words
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub llama_bin: String,
    pub llama_model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: usize,
    pub threads: Option<usize>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            llama_bin: "llama-cli".to_string(),
            llama_model: "models/llama_quant/llama-7B-quant.bin".to_string(),
            temperature: 0.5,
            top_p: 0.9,
            max_tokens: 512,
            threads: None,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
