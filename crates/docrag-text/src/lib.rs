//! docrag-text
//!
//! Tantivy-backed BM25 lexical index over corpus chunks. `TantivyIndexer`
//! builds the index at ingest time; `TantivyLexicalIndex` serves queries.
pub mod tantivy_utils;
pub mod index;
pub mod search;

pub use index::TantivyIndexer;
pub use search::TantivyLexicalIndex;
