use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::PathBuf;
use tracing::info;

use docrag_core::config::Config;
use docrag_core::data_processor::DataProcessor;
use docrag_core::traits::Embedder;
use docrag_core::{Chunk, Corpus};
use docrag_embed::load_embedder;
use docrag_text::TantivyIndexer;
use docrag_vector::LanceDbIndexer;

pub const EMBED_BATCH: usize = 64;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexOptions {
    pub docs_dir: Option<PathBuf>,
    pub skip_vector: bool,
    pub limit_files: Option<usize>,
}

impl IndexOptions {
    pub fn parse(args: &[String]) -> Result<Self> {
        let mut out = Self::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--skip-vector" | "-s" => out.skip_vector = true,
                "--limit-files" => {
                    let Some(n) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) else { bail!("--limit-files requires a number") };
                    out.limit_files = Some(n);
                    i += 1;
                }
                flag if flag.starts_with('-') => bail!("unknown flag {flag}"),
                dir => out.docs_dir = Some(PathBuf::from(dir)),
            }
            i += 1;
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSummary {
    pub chunks: usize,
    pub lexical_docs: usize,
    pub vectors: usize,
}

/// Chunk the docs directory, write `chunks.json`, rebuild the tantivy index
/// and, unless skipped, embed every chunk into a fresh LanceDB table.
pub fn run_indexing(config: &Config, opts: &IndexOptions) -> Result<IndexSummary> {
    let data = config.data()?;
    let models = config.models()?;
    let docs_dir = opts.docs_dir.clone().unwrap_or_else(|| config.resolve_path(&data.docs_dir));
    if !docs_dir.is_dir() {
        bail!("docs directory {} does not exist", docs_dir.display());
    }

    let processor = DataProcessor::with_settings(config.chunking()?)?;
    let chunks = match opts.limit_files {
        Some(limit) => processor.process_directory_limited(&docs_dir, limit)?,
        None => processor.process_directory(&docs_dir)?,
    };
    let corpus = Corpus::from_chunks(chunks.iter().cloned())?;
    let chunks_file = config.resolve_path(&data.chunks_file);
    corpus.save_json(&chunks_file)?;
    info!(chunks = chunks.len(), path = %chunks_file.display(), "wrote chunks file");

    let lexical_docs = TantivyIndexer::new(config.resolve_path(&data.tantivy_index_dir))?.index_chunks(&chunks)?;

    let vectors = if opts.skip_vector || chunks.is_empty() {
        0
    } else {
        let embedder = load_embedder(&config.resolve_path(&models.embed_model_dir), models.use_fake)?;
        let embeddings = embed_chunks(embedder.as_ref(), &chunks)?;
        let lancedb_dir = config.resolve_path(&data.lancedb_dir);
        if lancedb_dir.exists() {
            fs::remove_dir_all(&lancedb_dir).with_context(|| format!("clearing {}", lancedb_dir.display()))?;
        }
        fs::create_dir_all(&lancedb_dir)?;
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(async {
            let indexer = LanceDbIndexer::new(&lancedb_dir, &data.table_name, embedder.dim()).await?;
            indexer.index(&chunks, &embeddings).await
        })?
    };

    Ok(IndexSummary { chunks: chunks.len(), lexical_docs, vectors })
}

/// Embeds chunk contents in batches of [`EMBED_BATCH`].
pub fn embed_chunks(embedder: &dyn Embedder, chunks: &[Chunk]) -> Result<Vec<Vec<f32>>> {
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} embedded ({eta})")?.progress_chars("#>-"));
    let mut embeddings = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(EMBED_BATCH) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed_batch(&texts).with_context(|| format!("embedding with {}", embedder.name()))?;
        if vectors.len() != batch.len() {
            bail!("{} returned {} vectors for {} texts", embedder.name(), vectors.len(), batch.len());
        }
        embeddings.extend(vectors);
        pb.inc(batch.len() as u64);
    }
    pb.finish_and_clear();
    Ok(embeddings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_parse() {
        let args: Vec<String> = ["docs", "--skip-vector", "--limit-files", "3"].iter().map(|s| s.to_string()).collect();
        let opts = IndexOptions::parse(&args).expect("parse");
        assert_eq!(opts, IndexOptions { docs_dir: Some(PathBuf::from("docs")), skip_vector: true, limit_files: Some(3) });
        assert!(IndexOptions::parse(&["--limit-files".to_string()]).is_err());
    }
}
