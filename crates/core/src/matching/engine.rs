//! Match aggregation over products x trends

use serde::Serialize;
use tracing::debug;

use super::scoring::{MatchWeights, SignalScorer};
use super::text::ProductText;
use crate::domain::product::ProductSummary;
use crate::domain::report::{MatchReport, MatchResult, ProductMatchReport, UnmatchedEntry};
use crate::domain::trend::TrendSummary;

/// Full scoring detail for one (product, trend) pair, kept even when the pair
/// stays below the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairScore {
    pub trend_id: String,
    pub trend_name: String,
    pub raw_score: u32,
    pub confidence: u8,
    pub qualifies: bool,
    pub match_reasons: Vec<String>,
}

impl PairScore {
    fn into_match(self) -> MatchResult {
        MatchResult {
            trend_name: self.trend_name,
            trend_id: self.trend_id,
            confidence: self.confidence,
            match_reasons: self.match_reasons,
        }
    }
}

/// Rule-based trend matcher. Holds nothing but its weights, so one value can
/// serve any number of passes.
#[derive(Debug, Clone, Default)]
pub struct TrendMatcher {
    scorer: SignalScorer,
}

impl TrendMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: MatchWeights) -> Self {
        Self { scorer: SignalScorer::with_weights(weights) }
    }

    pub fn weights(&self) -> &MatchWeights {
        self.scorer.weights()
    }

    /// Runs one matching pass. Each product ends up either in `matches`, with
    /// its qualifying trends ordered by confidence, or in `unmatched_products`.
    pub fn find_matches(&self, products: &[ProductSummary], trends: &[TrendSummary]) -> MatchReport {
        let mut report = MatchReport::default();

        for product in products {
            let matched_trends = self.match_product(product, trends);
            if matched_trends.is_empty() {
                report.unmatched_products.push(UnmatchedEntry::for_product(product));
            } else {
                report.matches.push(ProductMatchReport {
                    product_id: product.id.clone(),
                    product_title: product.title.clone(),
                    product_type: product.product_type.clone(),
                    matched_trends,
                });
            }
        }

        debug!(
            event_name = "matching.pass.completed",
            products = products.len(),
            trends = trends.len(),
            matched = report.matched_count(),
            unmatched = report.unmatched_count(),
            "rule-based matching pass completed"
        );

        report
    }

    /// Qualifying trends for one product, highest confidence first.
    pub fn match_product(&self, product: &ProductSummary, trends: &[TrendSummary]) -> Vec<MatchResult> {
        let text = ProductText::from_product(product);
        let mut matched: Vec<MatchResult> = trends
            .iter()
            .map(|trend| self.score_text(&text, trend))
            .filter(|score| score.qualifies)
            .map(PairScore::into_match)
            .collect();

        matched.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        matched
    }

    /// Scores a single pair without applying the threshold filter.
    pub fn score_pair(&self, product: &ProductSummary, trend: &TrendSummary) -> PairScore {
        self.score_text(&ProductText::from_product(product), trend)
    }

    fn score_text(&self, text: &ProductText, trend: &TrendSummary) -> PairScore {
        let weights = self.scorer.weights();
        let hits = [
            self.scorer.target_products(text, trend),
            self.scorer.keywords(text, trend),
            self.scorer.hashtags(text, trend),
        ];

        let mut raw_score: u32 = 0;
        let mut match_reasons = Vec::new();
        for hit in hits.into_iter().flatten() {
            raw_score = raw_score.saturating_add(hit.points);
            match_reasons.push(hit.reason);
        }

        let ceiling = u32::from(weights.max_confidence);
        let confidence = u8::try_from(raw_score.min(ceiling)).unwrap_or(weights.max_confidence);

        PairScore {
            trend_id: trend.id.clone(),
            trend_name: trend.name.clone(),
            raw_score,
            confidence,
            qualifies: raw_score >= weights.threshold && !match_reasons.is_empty(),
            match_reasons,
        }
    }
}
