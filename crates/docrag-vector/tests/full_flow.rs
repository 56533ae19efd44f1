use docrag_core::traits::VectorIndex;
use docrag_core::Chunk;
use docrag_vector::{LanceDbIndexer, LanceVectorIndex};
use tempfile::TempDir;

fn chunk(id: &str) -> Chunk {
    Chunk { id: id.to_string(), source_path: format!("docs/{id}.md"), content: format!("content of {id}"), position_index: 0 }
}

#[test]
fn lancedb_full_flow() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().to_path_buf();
    let table = "chunks_test_tmp";
    let chunks = vec![chunk("east"), chunk("north"), chunk("northeast")];
    let s = std::f32::consts::FRAC_1_SQRT_2;
    let embeddings = vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0], vec![s, s, 0.0, 0.0]];

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let written = rt.block_on(async {
        let indexer = LanceDbIndexer::new(&db_path, table, 4).await?;
        indexer.index(&chunks, &embeddings).await
    }).expect("index");
    assert_eq!(written, 3);
    drop(rt);

    let index = LanceVectorIndex::open(&db_path, table).expect("open");
    assert_eq!(index.dim(), 4);
    assert_eq!(index.count().expect("count"), 3);

    let hits = index.search_vec(&[1.0, 0.0, 0.0, 0.0], 2).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].id, "east");
    assert!((hits[0].score - 1.0).abs() < 1e-4, "dot distance converts back to similarity");
    assert_eq!(hits[1].id, "northeast");
    assert!(hits[0].score >= hits[1].score);

    assert!(index.search_vec(&[1.0, 0.0], 2).is_err(), "dimension mismatch is rejected");
}

#[test]
fn indexer_rejects_misaligned_embeddings() {
    let tmp = TempDir::new().expect("tmp");
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    rt.block_on(async {
        let indexer = LanceDbIndexer::new(tmp.path(), "chunks", 2).await.expect("indexer");
        assert!(indexer.index(&[chunk("a")], &[]).await.is_err());
        assert!(indexer.index(&[chunk("a")], &[vec![1.0, 0.0, 0.0]]).await.is_err());
    });
}
