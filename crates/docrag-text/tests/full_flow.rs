use docrag_core::traits::LexicalIndex;
use docrag_core::Chunk;
use docrag_text::{TantivyIndexer, TantivyLexicalIndex};
use tempfile::TempDir;

fn chunk(id: &str, content: &str) -> Chunk {
    Chunk { id: id.to_string(), source_path: format!("{id}.md"), content: content.to_string(), position_index: 0 }
}

fn corpus() -> Vec<Chunk> {
    vec![
        chunk("tokenizer_0", "The tokenizer splits text into tokens. A fast tokenizer is backed by Rust."),
        chunk("pipeline_0", "Pipelines wrap a model and a tokenizer for inference."),
        chunk("training_0", "Training loops use an optimizer and a learning rate scheduler."),
    ]
}

#[test]
fn tantivy_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    let index_dir = tmp.path().join("tantivy");
    let indexer = TantivyIndexer::new(index_dir.clone()).expect("indexer");
    let count = indexer.index_chunks(&corpus()).expect("index chunks");
    assert_eq!(count, 3);

    let index = TantivyLexicalIndex::open(&index_dir).expect("open");
    assert_eq!(index.num_docs(), 3);

    let hits = index.search("tokenizer", 10).expect("search");
    assert_eq!(hits.len(), 2, "only chunks mentioning the term match");
    assert_eq!(hits[0].id, "tokenizer_0", "higher term frequency ranks first");
    assert!(hits[0].score >= hits[1].score);
    assert!(hits.iter().all(|h| h.score > 0.0));
}

#[test]
fn search_respects_limit_and_tolerates_query_syntax() {
    let tmp = TempDir::new().expect("tmp");
    let index_dir = tmp.path().join("tantivy");
    TantivyIndexer::new(index_dir.clone()).expect("indexer").index_chunks(&corpus()).expect("index");
    let index = TantivyLexicalIndex::open(&index_dir).expect("open");

    assert_eq!(index.search("tokenizer", 1).expect("search").len(), 1);
    assert!(index.search("tokenizer", 0).expect("search").is_empty());
    // unbalanced quote and parenthesis must not fail the call
    assert!(index.search("\"optimizer AND (", 5).is_ok());
}

#[test]
fn opening_a_missing_index_fails() {
    let tmp = TempDir::new().expect("tmp");
    assert!(TantivyLexicalIndex::open(&tmp.path().join("absent")).is_err());
}
