use anyhow::{anyhow, Result};
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;

pub const VECTOR_COLUMN: &str = "vector";

pub fn build_arrow_schema(dim: usize) -> Result<Arc<Schema>> {
	let dim = i32::try_from(dim).map_err(|_| anyhow!("embedding dimension {dim} does not fit an arrow list size"))?;
	Ok(Arc::new(Schema::new(vec![
		Field::new("id", DataType::Utf8, false),
		Field::new("source_path", DataType::Utf8, false),
		Field::new("content", DataType::Utf8, false),
		Field::new("position_index", DataType::Int32, false),
		Field::new(VECTOR_COLUMN, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	])))
}

/// Reads the fixed list size of the `vector` column.
pub fn vector_dim(schema: &Schema) -> Result<usize> {
	match schema.field_with_name(VECTOR_COLUMN)?.data_type() {
		DataType::FixedSizeList(_, n) => usize::try_from(*n).map_err(|_| anyhow!("negative vector size {n}")),
		other => Err(anyhow!("column '{VECTOR_COLUMN}' has type {other:?}, expected a fixed-size list")),
	}
}
