//! Hybrid lexical + dense retrieval with heuristic boosts and cross-encoder
//! reranking.
//!
//! Stages, in call order: [`lexical`] and [`dense`] adapters (run
//! concurrently), [`fusion`], [`boost`], [`pool`] selection, [`rerank`], then
//! result assembly in [`engine`]. Every stage is a pure transformation that
//! returns a new score collection.

pub mod boost;
pub mod dense;
pub mod engine;
pub mod fusion;
pub mod lexical;
pub mod pool;
pub mod rerank;

pub use boost::{BoostedScores, HeuristicBoost};
pub use dense::DenseScorer;
pub use engine::RetrievalEngine;
pub use fusion::{fuse, fuse_with, min_max};
pub use lexical::LexicalScorer;
pub use pool::{select_pool, sort_candidates};
pub use rerank::RerankStage;
