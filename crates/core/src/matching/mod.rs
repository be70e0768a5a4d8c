//! Deterministic trend matching
//!
//! Scores every (product, trend) pair from three signals and keeps the pairs
//! that clear the confidence threshold:
//! - target products: the trend's declared categories against title and type
//! - keywords: trend keywords anywhere in the product text
//! - hashtags: trend hashtags against catalog tags
//!
//! The pass is a pure function of its inputs. It is the fallback whenever the
//! generative matcher is unavailable or returns something unusable.

mod engine;
mod scoring;
mod text;

pub use engine::{PairScore, TrendMatcher};
pub use scoring::{MatchWeights, SignalHit, SignalScorer};
pub use text::{normalize_corpus, ProductText};

/// Weights the matcher has always used.
pub const DEFAULT_WEIGHTS: MatchWeights = MatchWeights {
    target_exact: 50,
    target_partial: 35,
    keyword: 5,
    hashtag: 10,
    threshold: 35,
    max_confidence: 100,
    keyword_reason_limit: 3,
    min_partial_word_len: 3,
};
