#[path = "../common/mod.rs"]
mod common;

use common::{chunk, CannedLexical, CannedVector, Fixture};
use docrag_core::config::RetrievalSettings;
use docrag_core::{Corpus, RetrievalRequest, ScoreMap};
use docrag_hybrid::{fuse, select_pool, HeuristicBoost};
use proptest::prelude::*;

fn score_map() -> impl Strategy<Value = ScoreMap> {
    prop::collection::hash_map("[a-f]{1,2}", -50.0f32..50.0, 0..12)
}

proptest! {
    #[test]
    fn alpha_zero_is_pure_lexical(lex in score_map(), dense in score_map()) {
        let fused = fuse(&lex, &dense, 0.0);
        for (id, score) in &fused {
            prop_assert_eq!(*score, lex.get(id).copied().unwrap_or(0.0));
        }
    }

    #[test]
    fn alpha_one_is_pure_dense(lex in score_map(), dense in score_map()) {
        let fused = fuse(&lex, &dense, 1.0);
        for (id, score) in &fused {
            prop_assert_eq!(*score, dense.get(id).copied().unwrap_or(0.0));
        }
    }

    #[test]
    fn fused_keys_are_the_union(lex in score_map(), dense in score_map(), alpha in 0.0f32..=1.0) {
        let fused = fuse(&lex, &dense, alpha);
        prop_assert!(lex.keys().chain(dense.keys()).all(|id| fused.contains_key(id)));
        prop_assert!(fused.keys().all(|id| lex.contains_key(id) || dense.contains_key(id)));
    }

    #[test]
    fn pool_is_bounded_and_ordered(scores in score_map(), pool_size in 1usize..15) {
        let pool = select_pool(&scores, pool_size);
        prop_assert_eq!(pool.len(), scores.len().min(pool_size));
        for w in pool.windows(2) {
            prop_assert!(w[0].score > w[1].score || (w[0].score == w[1].score && w[0].id < w[1].id));
        }
    }

    #[test]
    fn pool_ignores_insertion_order(entries in prop::collection::vec(("[a-z]{1,3}", 0u8..4), 0..20)) {
        // coarse scores force plenty of ties
        let forward: ScoreMap = entries.iter().map(|(id, s)| (id.clone(), f32::from(*s))).collect();
        let mut items: Vec<(String, f32)> = forward.iter().map(|(id, s)| (id.clone(), *s)).collect();
        items.reverse();
        let backward: ScoreMap = items.into_iter().collect();
        prop_assert_eq!(select_pool(&forward, 8), select_pool(&backward, 8));
    }

    #[test]
    fn boost_is_pure_and_bounded(scores in prop::collection::vec(-10.0f32..10.0, 4)) {
        let corpus = Corpus::from_chunks([
            chunk("c0", "guide/quickstart.md", "```sh\nrun\n```"),
            chunk("c1", "guide/quickstart.md", "prose"),
            chunk("c2", "ref/misc.md", "```sh\nrun\n```"),
            chunk("c3", "ref/misc.md", "prose"),
        ]).expect("corpus");
        let fused: ScoreMap = scores.iter().enumerate().map(|(i, s)| (format!("c{i}"), *s)).collect();
        let snapshot = fused.clone();
        let boost = HeuristicBoost::default();

        let once = boost.apply(&fused, &corpus);
        let twice = boost.apply(&fused, &corpus);
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(&fused, &snapshot);

        let expected_bonus = [3.0f32, 2.0, 1.0, 0.0];
        for (i, bonus) in expected_bonus.iter().enumerate() {
            let id = format!("c{i}");
            prop_assert!((once.as_map()[&id] - fused[&id] - bonus).abs() < 1e-4);
        }
    }

    #[test]
    fn results_never_exceed_top_k(
        lex in prop::collection::vec(0.0f32..20.0, 6),
        dense in prop::collection::vec(-1.0f32..1.0, 6),
        top_k in 1usize..10,
        pool_size in 1usize..10,
        alpha in 0.0f32..=1.0,
    ) {
        let ids = ["c0", "c1", "c2", "c3", "c4", "c5"];
        let lex: Vec<(&str, f32)> = ids.iter().copied().zip(lex).collect();
        let dense: Vec<(&str, f32)> = ids.iter().copied().zip(dense).collect();
        let chunks = ids.iter().map(|id| chunk(id, &format!("{id}.md"), id)).collect();
        let fx = Fixture::new(CannedLexical::new(&lex), CannedVector::new(&dense));
        let engine = fx.engine(chunks, RetrievalSettings::default());

        let req = RetrievalRequest::new("q").with_top_k(top_k).with_pool_size(pool_size).with_alpha(alpha);
        let results = engine.retrieve(&req).expect("retrieve");
        prop_assert!(results.len() <= top_k.min(pool_size));
        prop_assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        prop_assert_eq!(engine.retrieve(&req).expect("again"), results);
    }
}
