//! Trend-to-product matching core.
//!
//! Holds the catalog and trend records, the deterministic matcher that scores
//! products against trends, and the configuration shared by the binaries.

pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod library;
pub mod matching;

pub use catalog::{load_products, parse_products, CatalogError, CatalogProduct};
pub use domain::product::ProductSummary;
pub use domain::report::{
    MatchMethod, MatchOutcome, MatchReport, MatchResult, ProductMatchReport, UnmatchedEntry,
    UNMATCHED_REASON,
};
pub use domain::trend::TrendSummary;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use library::{LibraryError, TrendLibrary};
pub use matching::{MatchWeights, PairScore, TrendMatcher};
