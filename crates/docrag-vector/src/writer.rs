use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use arrow_array::{RecordBatch, RecordBatchIterator, Int32Array, FixedSizeListArray, StringArray};
use std::sync::Arc;
use std::path::Path;
use tracing::info;

use docrag_core::Chunk;
use crate::schema::build_arrow_schema;
use crate::table::{ensure_table, open_db};

const BATCH_SIZE: usize = 1000;

/// Appends chunk rows with their embeddings to a LanceDB table.
pub struct LanceDbIndexer { pub(crate) db: Connection, pub(crate) table_name: String, dim: usize }

impl LanceDbIndexer {
	pub async fn new(db_path: &Path, table_name: &str, dim: usize) -> Result<Self> {
		let db = open_db(db_path.to_string_lossy().as_ref()).await?;
		ensure_table(&db, table_name, build_arrow_schema(dim)?).await?;
		Ok(Self { db, table_name: table_name.to_string(), dim })
	}

	pub async fn index(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<usize> {
		if chunks.is_empty() { info!("no chunks to index"); return Ok(0); }
		if chunks.len() != embeddings.len() { bail!("{} chunks but {} embeddings", chunks.len(), embeddings.len()); }
		if let Some((chunk, e)) = chunks.iter().zip(embeddings).find(|(_, e)| e.len() != self.dim) {
			bail!("embedding for '{}' has dimension {}, table expects {}", chunk.id, e.len(), self.dim);
		}
		info!(chunks = chunks.len(), table = %self.table_name, "indexing into LanceDB");
		let pb = ProgressBar::new(chunks.len() as u64);
		pb.set_style(ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")?.progress_chars("#>-"));
		let mut processed = 0usize;
		for (chunk_batch, emb_batch) in chunks.chunks(BATCH_SIZE).zip(embeddings.chunks(BATCH_SIZE)) {
			self.insert_batch(chunk_batch, emb_batch).await?;
			processed += chunk_batch.len(); pb.set_position(processed as u64);
		}
		pb.finish_with_message("LanceDB indexing completed");
		info!(processed, "LanceDB indexing completed");
		Ok(processed)
	}

	async fn insert_batch(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<()> {
		let record_batch = self.to_record_batch(chunks, embeddings)?; let schema = record_batch.schema();
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
		self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
		Ok(())
	}

	fn to_record_batch(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<RecordBatch> {
		let schema = build_arrow_schema(self.dim)?;
		let dim = i32::try_from(self.dim)?;
		let mut ids = Vec::new(); let mut paths = Vec::new(); let mut contents = Vec::new(); let mut positions = Vec::new(); let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
		for (c, e) in chunks.iter().zip(embeddings) { ids.push(c.id.clone()); paths.push(c.source_path.clone()); contents.push(c.content.clone()); positions.push(i32::try_from(c.position_index)?); vectors.push(Some(e.iter().map(|&x| Some(x)).collect())); }
		let record_batch = RecordBatch::try_new(schema, vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(paths)),
			Arc::new(StringArray::from(contents)),
			Arc::new(Int32Array::from(positions)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), dim)),
		])?;
		Ok(record_batch)
	}
}
