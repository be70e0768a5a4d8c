//! Signal scoring for trend matching

use std::collections::HashSet;

use super::text::ProductText;
use crate::domain::trend::TrendSummary;

/// Points and limits used when scoring a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchWeights {
    /// Whole target phrase found in title or type (default: 50)
    pub target_exact: u32,
    /// Single target word found in title (default: 35)
    pub target_partial: u32,
    /// Per matching keyword (default: 5)
    pub keyword: u32,
    /// Flat award for any hashtag/tag overlap (default: 10)
    pub hashtag: u32,
    /// Minimum raw score for a pair to be reported (default: 35)
    pub threshold: u32,
    /// Confidence ceiling (default: 100)
    pub max_confidence: u8,
    /// Keywords quoted in the keyword reason (default: 3)
    pub keyword_reason_limit: usize,
    /// Target words must be longer than this to count (default: 3)
    pub min_partial_word_len: usize,
}

impl Default for MatchWeights {
    fn default() -> Self {
        super::DEFAULT_WEIGHTS
    }
}

/// Points awarded by one signal and the reason it fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalHit {
    pub points: u32,
    pub reason: String,
}

/// Computes the three per-pair signals.
#[derive(Debug, Clone, Default)]
pub struct SignalScorer {
    weights: MatchWeights,
}

impl SignalScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: MatchWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchWeights {
        &self.weights
    }

    /// Checks the trend's target categories in order. The first target that
    /// fires, by whole phrase or by a single long word, is the only one that
    /// counts for this trend.
    pub fn target_products(&self, text: &ProductText, trend: &TrendSummary) -> Option<SignalHit> {
        for target in &trend.target_products {
            if target.trim().is_empty() {
                continue;
            }

            let target_lower = target.to_lowercase();
            if text.title.contains(&target_lower) || text.product_type.contains(&target_lower) {
                return Some(SignalHit {
                    points: self.weights.target_exact,
                    reason: format!("'{target}' in target_products matches product"),
                });
            }

            let partial = target_lower.split_whitespace().find(|word| {
                word.chars().count() > self.weights.min_partial_word_len
                    && text.title.contains(word)
            });
            if let Some(word) = partial {
                return Some(SignalHit {
                    points: self.weights.target_partial,
                    reason: format!("'{word}' from target_products found in title"),
                });
            }
        }

        None
    }

    /// Awards points for every keyword found in the product corpus.
    pub fn keywords(&self, text: &ProductText, trend: &TrendSummary) -> Option<SignalHit> {
        let matched: Vec<&str> = trend
            .keywords
            .iter()
            .filter(|keyword| !keyword.trim().is_empty())
            .filter(|keyword| text.corpus.contains(&keyword.to_lowercase()))
            .map(String::as_str)
            .collect();

        if matched.is_empty() {
            return None;
        }

        let quoted = matched.len().min(self.weights.keyword_reason_limit);
        let count = u32::try_from(matched.len()).unwrap_or(u32::MAX);
        Some(SignalHit {
            points: self.weights.keyword.saturating_mul(count),
            reason: format!("keywords match: {}", matched[..quoted].join(", ")),
        })
    }

    /// Flat award when any trend hashtag equals a catalog tag.
    pub fn hashtags(&self, text: &ProductText, trend: &TrendSummary) -> Option<SignalHit> {
        let hashtags: HashSet<String> = trend
            .hashtags
            .iter()
            .map(|hashtag| hashtag.trim_start_matches('#').to_lowercase())
            .filter(|hashtag| !hashtag.is_empty())
            .collect();

        let mut shared: Vec<&str> = Vec::new();
        for tag in &text.tags {
            if hashtags.contains(tag) && !shared.contains(&tag.as_str()) {
                shared.push(tag);
            }
        }

        if shared.is_empty() {
            return None;
        }

        Some(SignalHit {
            points: self.weights.hashtag,
            reason: format!("tag matches: {}", shared.join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductSummary;

    fn text(title: &str, product_type: &str, tags: &[&str]) -> ProductText {
        ProductText::from_product(
            &ProductSummary::new("p1", title, product_type).with_tags(tags.iter().copied()),
        )
    }

    #[test]
    fn exact_target_phrase_in_title_scores_fifty() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Aura").with_target_products(["trench coats"]);

        let hit = scorer.target_products(&text("Classic Trench Coats", "Coats", &[]), &trend);

        assert_eq!(
            hit,
            Some(SignalHit {
                points: 50,
                reason: "'trench coats' in target_products matches product".to_string()
            })
        );
    }

    #[test]
    fn exact_target_phrase_in_type_scores_fifty() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Aura").with_target_products(["Blazers"]);

        let hit = scorer.target_products(&text("Wool Jacket", "Blazers", &[]), &trend);

        assert_eq!(hit.map(|hit| hit.points), Some(50));
    }

    #[test]
    fn partial_target_word_in_title_scores_thirty_five() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Aura").with_target_products(["trench coats"]);

        let hit = scorer.target_products(&text("Classic Trench Coat", "Coats", &[]), &trend);

        assert_eq!(
            hit,
            Some(SignalHit {
                points: 35,
                reason: "'trench' from target_products found in title".to_string()
            })
        );
    }

    #[test]
    fn short_target_words_are_ignored() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Denim").with_target_products(["mom fit"]);

        assert_eq!(scorer.target_products(&text("Mom Jeans", "Denim", &[]), &trend), None);
    }

    #[test]
    fn partial_words_are_only_checked_against_title() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Gorpcore").with_target_products(["fleece jackets"]);

        assert_eq!(scorer.target_products(&text("Zip Pullover", "Fleece", &[]), &trend), None);
    }

    #[test]
    fn only_the_first_firing_target_counts() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Aura")
            .with_target_products(["trench jackets", "trench coats", "coat"]);

        let hit = scorer.target_products(&text("Classic Trench Coats", "Coats", &[]), &trend);

        assert_eq!(
            hit,
            Some(SignalHit {
                points: 35,
                reason: "'trench' from target_products found in title".to_string()
            })
        );
    }

    #[test]
    fn blank_targets_never_match() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Empty").with_target_products(["", "   "]);

        assert_eq!(scorer.target_products(&text("Anything", "Goes", &[]), &trend), None);
    }

    #[test]
    fn keywords_add_five_each_and_quote_at_most_three() {
        let scorer = SignalScorer::new();
        let product = ProductSummary::new("p1", "Vintage Wool Blazer", "Outerwear")
            .with_description("Tailored tweed with a classic academic cut");
        let trend = TrendSummary::new("t1", "Dark Academia")
            .with_keywords(["Wool", "tweed", "vintage", "classic", "neon"]);

        let hit = scorer.keywords(&ProductText::from_product(&product), &trend);

        assert_eq!(
            hit,
            Some(SignalHit {
                points: 20,
                reason: "keywords match: Wool, tweed, vintage".to_string()
            })
        );
    }

    #[test]
    fn keywords_match_tags_through_the_corpus() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Y2K").with_keywords(["y2k"]);

        let hit = scorer.keywords(&text("Baby Tee", "Tops", &["Y2K"]), &trend);

        assert_eq!(hit.map(|hit| hit.points), Some(5));
    }

    #[test]
    fn blank_keywords_are_skipped() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Blank").with_keywords([""]);

        assert_eq!(scorer.keywords(&text("Basic Socks", "Accessories", &[]), &trend), None);
    }

    #[test]
    fn hashtag_overlap_awards_ten_once() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Dark Academia").with_hashtags([
            "#darkacademia",
            "#Vintage",
            "#moody",
        ]);

        let hit = scorer
            .hashtags(&text("Wool Blazer", "Outerwear", &["Vintage", "darkacademia"]), &trend);

        assert_eq!(
            hit,
            Some(SignalHit {
                points: 10,
                reason: "tag matches: vintage, darkacademia".to_string()
            })
        );
    }

    #[test]
    fn hashtags_without_prefix_still_match() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Gorpcore").with_hashtags(["gorpcore"]);

        let hit = scorer.hashtags(&text("Fleece", "Jackets", &["gorpcore", "GORPCORE"]), &trend);

        assert_eq!(hit.map(|hit| hit.reason), Some("tag matches: gorpcore".to_string()));
    }

    #[test]
    fn lone_hash_does_not_match_anything() {
        let scorer = SignalScorer::new();
        let trend = TrendSummary::new("t1", "Noise").with_hashtags(["#"]);

        assert_eq!(scorer.hashtags(&text("Socks", "Accessories", &[""]), &trend), None);
    }
}
