//! docrag-embed
//!
//! Model-backed collaborators on candle: a BERT sentence embedder and a BERT
//! cross-encoder reranker, plus deterministic fakes selected by
//! `models.use_fake` or `APP_USE_FAKE_EMBEDDINGS=1`.
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use docrag_core::traits::{Embedder, Reranker};

pub mod bert;
pub mod cross_encoder;
pub mod device;
pub mod fake;
pub mod pool;
pub mod tokenize;
pub mod weights;

pub use bert::BertEmbedder;
pub use cross_encoder::CrossEncoderReranker;
pub use fake::{FakeEmbedder, OverlapReranker};
pub use pool::masked_mean_l2;

/// Dimension of the fake embedder, matching all-MiniLM-L6-v2.
pub const FAKE_DIM: usize = 384;

fn fake_requested(use_fake: bool) -> bool {
    use_fake || std::env::var("APP_USE_FAKE_EMBEDDINGS").ok().is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

pub fn load_embedder(model_dir: &Path, use_fake: bool) -> Result<Arc<dyn Embedder>> {
    if fake_requested(use_fake) { info!("using FakeEmbedder"); return Ok(Arc::new(FakeEmbedder::new(FAKE_DIM))); }
    Ok(Arc::new(BertEmbedder::load(model_dir)?))
}

pub fn load_reranker(model_dir: &Path, use_fake: bool) -> Result<Arc<dyn Reranker>> {
    if fake_requested(use_fake) { info!("using OverlapReranker"); return Ok(Arc::new(OverlapReranker)); }
    Ok(Arc::new(CrossEncoderReranker::load(model_dir)?))
}
