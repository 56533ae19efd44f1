use anyhow::Result;
use std::path::Path;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, ReloadPolicy, TantivyDocument};
use tracing::debug;

use docrag_core::traits::LexicalIndex;
use docrag_core::SearchHit;

use crate::tantivy_utils::{register_tokenizer, CONTENT_FIELD, ID_FIELD};

/// Read-only BM25 view over an existing tantivy index. The reader is opened
/// once; every search takes its own searcher snapshot, so concurrent queries
/// need no locking.
pub struct TantivyLexicalIndex {
	index: Index,
	reader: IndexReader,
	id_field: tantivy::schema::Field,
	content_field: tantivy::schema::Field,
}

impl TantivyLexicalIndex {
	pub fn open(index_dir: &Path) -> Result<Self> {
		let index = Index::open_in_dir(index_dir)?;
		register_tokenizer(&index);
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;
		let schema = index.schema();
		let id_field = schema.get_field(ID_FIELD)?;
		let content_field = schema.get_field(CONTENT_FIELD)?;
		Ok(Self { index, reader, id_field, content_field })
	}

	pub fn num_docs(&self) -> u64 { self.reader.searcher().num_docs() }
}

impl LexicalIndex for TantivyLexicalIndex {
	fn name(&self) -> &str { "tantivy" }

	fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
		if limit == 0 { return Ok(vec![]); }
		let searcher = self.reader.searcher();
		let qp = QueryParser::for_index(&self.index, vec![self.content_field]);
		// Raw user text goes straight through; syntax errors only drop the offending clause.
		let (q, errors) = qp.parse_query_lenient(query);
		if !errors.is_empty() { debug!(?errors, "lenient query parse dropped clauses"); }
		let top_docs = searcher.search(&q, &TopDocs::with_limit(limit))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			if let Some(id) = doc.get_first(self.id_field).and_then(|v| v.as_str()) {
				hits.push(SearchHit::new(id, score));
			}
		}
		Ok(hits)
	}
}
