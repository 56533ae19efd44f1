use anyhow::Result;
use std::path::PathBuf;
use tantivy::{doc, Index, IndexWriter};
use tracing::info;

use docrag_core::Chunk;

use crate::tantivy_utils::{build_schema, register_tokenizer, CONTENT_FIELD, ID_FIELD, POSITION_FIELD, SOURCE_PATH_FIELD};

/// Builds a fresh tantivy index from corpus chunks.
pub struct TantivyIndexer {
	index: Index,
	id_field: tantivy::schema::Field,
	content_field: tantivy::schema::Field,
	source_path_field: tantivy::schema::Field,
	position_field: tantivy::schema::Field,
}

impl TantivyIndexer {
	/// Recreates `index_dir` from scratch.
	pub fn new(index_dir: PathBuf) -> Result<Self> {
		let schema = build_schema();
		if index_dir.exists() { std::fs::remove_dir_all(&index_dir)?; }
		std::fs::create_dir_all(&index_dir)?;
		let index = Index::create_in_dir(&index_dir, schema.clone())?;
		register_tokenizer(&index);
		let id_field = schema.get_field(ID_FIELD)?;
		let content_field = schema.get_field(CONTENT_FIELD)?;
		let source_path_field = schema.get_field(SOURCE_PATH_FIELD)?;
		let position_field = schema.get_field(POSITION_FIELD)?;
		Ok(Self { index, id_field, content_field, source_path_field, position_field })
	}

	pub fn index_chunks(&self, chunks: &[Chunk]) -> Result<usize> {
		let mut index_writer: IndexWriter = self.index.writer(50_000_000)?;
		for c in chunks {
			index_writer.add_document(doc!(
				self.id_field => c.id.clone(),
				self.content_field => c.content.clone(),
				self.source_path_field => c.source_path.clone(),
				self.position_field => c.position_index as u64,
			))?;
		}
		index_writer.commit()?;
		info!(chunks = chunks.len(), "tantivy index committed");
		Ok(chunks.len())
	}
}
