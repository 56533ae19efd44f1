//! Shared wiring for the `docrag` and `docrag-indexer` binaries.

pub mod indexing;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use docrag_core::config::{Config, GenerationSettings, RetrievalSettings};
use docrag_core::{Corpus, RetrievalRequest, RetrievalResult};
use docrag_embed::{load_embedder, load_reranker};
use docrag_generate::{GenerationParams, LlamaCliGenerator};
use docrag_hybrid::RetrievalEngine;
use docrag_text::TantivyLexicalIndex;
use docrag_vector::LanceVectorIndex;

const PREVIEW_CHARS: usize = 300;

/// Logs go to stderr so stdout only carries results. Filter from `DOCRAG_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCRAG_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).with_writer(std::io::stderr).init();
}

/// Opens the corpus and both indexes named in `config` and loads the models.
/// A reranker that fails to load is logged and left out.
pub fn build_engine(config: &Config, retrieval: RetrievalSettings) -> Result<RetrievalEngine> {
    let data = config.data()?;
    let models = config.models()?;

    let chunks_file = config.resolve_path(&data.chunks_file);
    let corpus = Corpus::load_json(&chunks_file)
        .with_context(|| format!("loading corpus from {} (run docrag-indexer first)", chunks_file.display()))?;
    let tantivy_dir = config.resolve_path(&data.tantivy_index_dir);
    let lexical = TantivyLexicalIndex::open(&tantivy_dir)
        .with_context(|| format!("opening tantivy index at {}", tantivy_dir.display()))?;
    let lancedb_dir = config.resolve_path(&data.lancedb_dir);
    let vector = LanceVectorIndex::open(&lancedb_dir, &data.table_name)
        .with_context(|| format!("opening LanceDB table '{}' at {}", data.table_name, lancedb_dir.display()))?;
    let embedder = load_embedder(&config.resolve_path(&models.embed_model_dir), models.use_fake)?;

    let rerank = retrieval.rerank;
    let mut engine = RetrievalEngine::new(Arc::new(corpus), Arc::new(lexical), Arc::new(vector), embedder, retrieval)?;
    if rerank {
        match load_reranker(&config.resolve_path(&models.rerank_model_dir), models.use_fake) {
            Ok(reranker) => engine = engine.with_reranker(reranker),
            Err(e) => warn!(error = %format!("{e:#}"), "reranker not loaded; results keep fused order"),
        }
    }
    Ok(engine)
}

/// A bare binary name such as `llama-cli` is left for `PATH` lookup; anything
/// with a directory component is resolved against the config directory.
pub fn generator(config: &Config, settings: &GenerationSettings) -> LlamaCliGenerator {
    let bin = if Path::new(&settings.llama_bin).components().count() > 1 {
        config.resolve_path(&settings.llama_bin)
    } else {
        PathBuf::from(&settings.llama_bin)
    };
    LlamaCliGenerator::new(bin, config.resolve_path(&settings.llama_model))
}

/// Flags shared by `docrag query` and `docrag ask`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QueryArgs {
    pub query: String,
    pub top_k: Option<usize>,
    pub alpha: Option<f32>,
    pub pool_size: Option<usize>,
    pub no_rerank: bool,
    pub json: bool,
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
}

fn value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> Result<T> {
    let Some(raw) = args.get(i + 1) else { bail!("{flag} requires a value") };
    raw.parse::<T>().map_err(|_| anyhow::anyhow!("{flag}: invalid value '{raw}'"))
}

impl QueryArgs {
    /// Bare words form the query; everything starting with `--` is a flag.
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut out = Self::default();
        let mut words = Vec::new();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--top-k" | "-k" => { out.top_k = Some(value(args, i, "--top-k")?); i += 1; }
                "--alpha" | "-a" => { out.alpha = Some(value(args, i, "--alpha")?); i += 1; }
                "--pool-size" => { out.pool_size = Some(value(args, i, "--pool-size")?); i += 1; }
                "--temperature" => { out.temperature = Some(value(args, i, "--temperature")?); i += 1; }
                "--max-tokens" => { out.max_tokens = Some(value(args, i, "--max-tokens")?); i += 1; }
                "--no-rerank" => out.no_rerank = true,
                "--json" => out.json = true,
                flag if flag.starts_with("--") => bail!("unknown flag {flag}"),
                word => words.push(word.to_string()),
            }
            i += 1;
        }
        out.query = words.join(" ");
        Ok(out)
    }

    pub fn retrieval_settings(&self, mut settings: RetrievalSettings) -> RetrievalSettings {
        if self.no_rerank {
            settings.rerank = false;
        }
        settings
    }

    /// Engine defaults overridden by whatever flags were given.
    pub fn request(&self, engine: &RetrievalEngine) -> RetrievalRequest {
        let mut req = engine.request(self.query.clone());
        if let Some(k) = self.top_k { req = req.with_top_k(k); }
        if let Some(a) = self.alpha { req = req.with_alpha(a); }
        if let Some(p) = self.pool_size { req = req.with_pool_size(p); }
        req
    }

    pub fn generation_params(&self, settings: &GenerationSettings) -> GenerationParams {
        let mut params = GenerationParams::from_settings(settings);
        if let Some(t) = self.temperature { params.temperature = t; }
        if let Some(m) = self.max_tokens { params.max_tokens = m; }
        params
    }
}

pub fn preview(content: &str) -> String {
    let mut out: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().nth(PREVIEW_CHARS).is_some() {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

pub fn print_results(results: &[RetrievalResult]) {
    if results.is_empty() {
        println!("No results.");
        return;
    }
    for (i, r) in results.iter().enumerate() {
        println!("\n  {}. score={:.4}  id={}  source={}", i + 1, r.score, r.id, r.source_path);
        println!("     {}", preview(&r.content));
    }
}
