use std::cmp::Ordering;

use docrag_core::{Candidate, ScoreMap};

/// Score descending, ties by id ascending. Total over all floats, so the
/// order is the same on every run.
pub fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id))
}

pub fn sort_candidates(candidates: &mut [Candidate]) {
    candidates.sort_by(rank_order);
}

/// Top `pool_size` entries of `scores` under [`rank_order`].
pub fn select_pool(scores: &ScoreMap, pool_size: usize) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = scores.iter().map(|(id, &s)| Candidate::new(id.clone(), s)).collect();
    sort_candidates(&mut ranked);
    ranked.truncate(pool_size);
    ranked
}
