use candle_core::{DType, Device, Tensor};
use docrag_core::traits::{Embedder, Reranker};
use docrag_embed::{load_embedder, masked_mean_l2, FakeEmbedder, OverlapReranker, FAKE_DIM};
use std::path::Path;

#[test]
fn fake_embedder_shapes_and_determinism() {
    let embedder = load_embedder(Path::new("does-not-exist"), true).expect("embedder");
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), FAKE_DIM);
    assert_eq!(embedder.dim(), FAKE_DIM);

    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    for (a, b) in v1.iter().zip(v2.iter()) { assert!((a - b).abs() <= 1e-6); }
}

#[test]
fn fake_embedder_prefers_shared_terms() {
    let embedder = FakeEmbedder::new(64);
    let embs = embedder.embed_batch(&["load tokenizer".to_string(), "load tokenizer quickly".to_string(), "optimizer schedule".to_string()]).unwrap();
    let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    assert!(dot(&embs[0], &embs[1]) > dot(&embs[0], &embs[2]));
}

#[test]
fn overlap_reranker_scores_align_with_inputs() {
    let scores = OverlapReranker.score_pairs("Load the tokenizer", &["tokenizer docs", "nothing here", "load the tokenizer now"]).unwrap();
    assert_eq!(scores.len(), 3);
    assert!((scores[2] - 1.0).abs() < 1e-6);
    assert!((scores[0] - 1.0 / 3.0).abs() < 1e-6);
    assert_eq!(scores[1], 0.0);
    assert!(OverlapReranker.score_pairs("q", &[]).unwrap().is_empty());
}

#[test]
fn masked_mean_l2_basic() {
    let dev = Device::Cpu;
    // Two tokens with hidden dim 4; second token is masked out.
    let h = Tensor::from_slice(&[1.0f32, 2.0, 3.0, 4.0,  // token 0
                                 5.0, 6.0, 7.0, 8.0],    // token 1
                               (1, 2, 4), &dev).unwrap();
    let mask = Tensor::from_slice(&[1u32, 0u32], (1, 2), &dev).unwrap()
        .to_dtype(DType::F32).unwrap();
    let out = masked_mean_l2(&h, &mask).unwrap();
    let v: Vec<Vec<f32>> = out.to_vec2().unwrap();
    let v = &v[0];
    // Mean over unmasked tokens = first token [1,2,3,4], then L2 normalize
    let norm: f32 = (1.0f32*1.0 + 2.0*2.0 + 3.0*3.0 + 4.0*4.0).sqrt();
    let expected = [1.0/norm, 2.0/norm, 3.0/norm, 4.0/norm];
    for (a,b) in v.iter().cloned().zip(expected) {
        assert!((a - b).abs() < 1e-5, "a={} b={}", a, b);
    }
}

#[test]
fn masked_mean_l2_rejects_wrong_rank() {
    let dev = Device::Cpu;
    let h = Tensor::zeros((2, 4), DType::F32, &dev).unwrap();
    let mask = Tensor::ones((2, 4), DType::F32, &dev).unwrap();
    assert!(masked_mean_l2(&h, &mask).is_err());
}
