//! docrag-vector
//!
//! Inner-product vector indexes over normalised chunk embeddings:
//! - `FlatIpIndex`: exact in-memory search, suited to small corpora and tests
//! - `LanceVectorIndex`: a LanceDB table searched with dot-product distance
//! - `LanceDbIndexer`: writes chunk rows and embeddings into that table
pub mod flat;
pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use flat::FlatIpIndex;
pub use search::LanceVectorIndex;
pub use writer::LanceDbIndexer;
