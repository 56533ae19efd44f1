use docrag_core::config::BoostSettings;
use docrag_core::{Chunk, Corpus, ScoreMap};

/// Additive bonuses for chunks that look like programmatic documentation.
///
/// - path bonus: the lowercased source path contains any configured keyword
/// - code-fence bonus: the content contains the fence marker
///
/// Both bonuses stack. The keyword list is lowercased once at construction.
#[derive(Debug, Clone)]
pub struct HeuristicBoost {
    path_keywords: Vec<String>,
    path_bonus: f32,
    code_fence_bonus: f32,
    code_fence_marker: String,
}

/// Scores that already carry the heuristic bonus. Only [`HeuristicBoost::apply`]
/// produces this type and `apply` takes plain fused scores, so a bonus can
/// not be added twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoostedScores(ScoreMap);

impl BoostedScores {
    pub fn as_map(&self) -> &ScoreMap {
        &self.0
    }
}

impl Default for HeuristicBoost {
    fn default() -> Self {
        Self::from_settings(&BoostSettings::default())
    }
}

impl HeuristicBoost {
    pub fn from_settings(settings: &BoostSettings) -> Self {
        Self {
            path_keywords: settings
                .path_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            path_bonus: settings.path_bonus,
            code_fence_bonus: settings.code_fence_bonus,
            code_fence_marker: settings.code_fence_marker.clone(),
        }
    }

    pub fn bonus_for(&self, chunk: &Chunk) -> f32 {
        let mut bonus = 0.0;
        let path = chunk.source_path.to_lowercase();
        if self.path_keywords.iter().any(|k| path.contains(k.as_str())) {
            bonus += self.path_bonus;
        }
        if !self.code_fence_marker.is_empty() && chunk.content.contains(&self.code_fence_marker) {
            bonus += self.code_fence_bonus;
        }
        bonus
    }

    /// Returns a new map; `fused` is left untouched. Ids the corpus does not
    /// know get no bonus.
    pub fn apply(&self, fused: &ScoreMap, corpus: &Corpus) -> BoostedScores {
        BoostedScores(
            fused
                .iter()
                .map(|(id, &score)| {
                    let bonus = corpus.get(id).map(|c| self.bonus_for(c)).unwrap_or(0.0);
                    (id.clone(), score + bonus)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, path: &str, content: &str) -> Chunk {
        Chunk { id: id.into(), source_path: path.into(), content: content.into(), position_index: 0 }
    }

    #[test]
    fn bonuses_stack() {
        let boost = HeuristicBoost::default();
        assert_eq!(boost.bonus_for(&chunk("a", "docs/Tutorial/pipelines.md", "see ```py\nx\n```")), 3.0);
        assert_eq!(boost.bonus_for(&chunk("b", "docs/tutorial/pipelines.md", "plain")), 2.0);
        assert_eq!(boost.bonus_for(&chunk("c", "docs/philosophy.md", "```rust")), 1.0);
        assert_eq!(boost.bonus_for(&chunk("d", "docs/philosophy.md", "plain")), 0.0);
    }

    #[test]
    fn keyword_match_is_a_substring_match() {
        // "usage" is a configured keyword; "advanced_usage_notes" contains it
        let boost = HeuristicBoost::default();
        assert_eq!(boost.bonus_for(&chunk("a", "guides/advanced_usage_notes.md", "")), 2.0);
    }

    #[test]
    fn custom_settings_are_honoured() {
        let settings = BoostSettings {
            path_keywords: vec!["Guide".into()],
            path_bonus: 0.5,
            code_fence_bonus: 0.0,
            code_fence_marker: "~~~".into(),
        };
        let boost = HeuristicBoost::from_settings(&settings);
        assert_eq!(boost.bonus_for(&chunk("a", "user_guide.md", "~~~")), 0.5);
        assert_eq!(boost.bonus_for(&chunk("b", "api.md", "```")), 0.0);
    }

    #[test]
    fn apply_leaves_input_alone() {
        let corpus = Corpus::from_chunks([chunk("a", "quickstart.md", "x")]).expect("corpus");
        let fused: ScoreMap = [("a".to_string(), 1.0), ("ghost".to_string(), 0.5)].into_iter().collect();
        let boosted = boost_twice(&fused, &corpus);
        assert_eq!(fused["a"], 1.0);
        assert_eq!(boosted.as_map()["a"], 3.0);
        assert_eq!(boosted.as_map()["ghost"], 0.5);
    }

    fn boost_twice(fused: &ScoreMap, corpus: &Corpus) -> BoostedScores {
        let boost = HeuristicBoost::default();
        let first = boost.apply(fused, corpus);
        let second = boost.apply(fused, corpus);
        assert_eq!(first, second);
        second
    }
}
