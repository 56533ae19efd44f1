use anyhow::{anyhow, bail, Result};
use arrow_array::{Float32Array, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{DistanceType, Table};
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;

use docrag_core::traits::VectorIndex;
use docrag_core::SearchHit;

use crate::schema::vector_dim;
use crate::table::open_db;

/// Blocking view over a LanceDB table, searched by dot product.
///
/// Owns its own tokio runtime, so it must not be driven from inside another
/// runtime's async context.
pub struct LanceVectorIndex { rt: Runtime, table: Table, dim: usize }

impl LanceVectorIndex {
	pub fn open(db_path: &Path, table_name: &str) -> Result<Self> {
		let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
		let uri = db_path.to_string_lossy().to_string();
		let (table, dim) = rt.block_on(async {
			let db = open_db(&uri).await?;
			let table = db.open_table(table_name).execute().await?;
			let schema = table.schema().await?;
			let dim = vector_dim(&schema)?;
			Ok::<_, anyhow::Error>((table, dim))
		})?;
		info!(table = table_name, dim, "opened LanceDB vector index");
		Ok(Self { rt, table, dim })
	}

	pub fn count(&self) -> Result<usize> {
		Ok(self.rt.block_on(self.table.count_rows(None))?)
	}
}

impl VectorIndex for LanceVectorIndex {
	fn name(&self) -> &str { "lancedb" }

	fn dim(&self) -> usize { self.dim }

	fn search_vec(&self, query_vec: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
		if query_vec.len() != self.dim { bail!("query has dimension {}, index expects {}", query_vec.len(), self.dim); }
		if limit == 0 { return Ok(vec![]); }
		self.rt.block_on(async {
			let mut stream = self.table.vector_search(query_vec.to_vec())?.distance_type(DistanceType::Dot).limit(limit).execute().await?;
			let mut hits = Vec::new();
			while let Some(batch) = stream.try_next().await? {
				let ids = batch.column_by_name("id").and_then(|c| c.as_any().downcast_ref::<StringArray>()).ok_or_else(|| anyhow!("missing id column"))?;
				let distances = batch.column_by_name("_distance").and_then(|c| c.as_any().downcast_ref::<Float32Array>()).ok_or_else(|| anyhow!("missing _distance column"))?;
				// Lance reports dot distance as 1 - <q, v>.
				for i in 0..batch.num_rows() { hits.push(SearchHit::new(ids.value(i), 1.0 - distances.value(i))); }
			}
			Ok(hits)
		})
	}
}
