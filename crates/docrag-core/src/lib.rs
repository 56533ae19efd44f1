//! Shared data model, error taxonomy, collaborator traits and configuration
//! for the docrag retrieval workspace.
//!
//! The engine itself lives in `docrag-hybrid`; index, model and generation
//! backends implement the traits in [`traits`].

pub mod config;
pub mod corpus;
pub mod data_processor;
pub mod error;
pub mod traits;
pub mod types;

pub use corpus::Corpus;
pub use error::{RetrievalError, Stage};
pub use types::{Candidate, Chunk, ChunkId, RetrievalRequest, RetrievalResult, ScoreMap, SearchHit};
