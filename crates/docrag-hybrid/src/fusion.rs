//! Convex combination of lexical and dense scores.

use docrag_core::config::Normalization;
use docrag_core::ScoreMap;

/// `(1 - alpha) * lexical + alpha * dense` over the union of both key sets.
/// An id missing from one side contributes zero for that side.
///
/// Raw scores are combined as-is. BM25 and inner products live on different
/// scales, so `alpha` only has its nominal meaning when callers normalise
/// first (see [`fuse_with`]).
pub fn fuse(lexical: &ScoreMap, dense: &ScoreMap, alpha: f32) -> ScoreMap {
    let mut fused = ScoreMap::with_capacity(lexical.len() + dense.len());
    for (id, &score) in lexical {
        fused.insert(id.clone(), (1.0 - alpha) * score + alpha * dense.get(id).copied().unwrap_or(0.0));
    }
    for (id, &score) in dense {
        if !lexical.contains_key(id) {
            fused.insert(id.clone(), (1.0 - alpha) * 0.0 + alpha * score);
        }
    }
    fused
}

/// [`fuse`] after applying `normalization` to each side independently.
pub fn fuse_with(lexical: &ScoreMap, dense: &ScoreMap, alpha: f32, normalization: Normalization) -> ScoreMap {
    match normalization {
        Normalization::None => fuse(lexical, dense, alpha),
        Normalization::MinMax => fuse(&min_max(lexical), &min_max(dense), alpha),
    }
}

/// Rescales scores into [0, 1]. A map whose scores are all equal (including
/// a single entry) maps every id to 1.0, so a lone hit keeps full weight.
pub fn min_max(scores: &ScoreMap) -> ScoreMap {
    let Some((lo, hi)) = scores.values().fold(None, |acc: Option<(f32, f32)>, &s| match acc {
        None => Some((s, s)),
        Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
    }) else {
        return ScoreMap::new();
    };
    let span = hi - lo;
    scores
        .iter()
        .map(|(id, &s)| {
            let v = if span > 0.0 { (s - lo) / span } else { 1.0 };
            (id.clone(), v)
        })
        .collect()
}
