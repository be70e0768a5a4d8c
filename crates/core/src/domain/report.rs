use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::product::ProductSummary;
use crate::errors::DomainError;

/// Reason recorded for products that cleared no trend.
pub const UNMATCHED_REASON: &str = "No matching trends found";

/// Highest confidence a match can carry.
pub const MAX_CONFIDENCE: u8 = 100;

/// One qualifying (product, trend) pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchResult {
    pub trend_name: String,
    pub trend_id: String,
    pub confidence: u8,
    pub match_reasons: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductMatchReport {
    pub product_id: String,
    pub product_title: String,
    pub product_type: String,
    pub matched_trends: Vec<MatchResult>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnmatchedEntry {
    pub product_id: String,
    pub product_title: String,
    pub reason: String,
}

impl UnmatchedEntry {
    pub fn for_product(product: &ProductSummary) -> Self {
        Self {
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            reason: UNMATCHED_REASON.to_string(),
        }
    }
}

/// Result of one matching pass: every input product lands in exactly one of
/// the two lists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchReport {
    pub matches: Vec<ProductMatchReport>,
    pub unmatched_products: Vec<UnmatchedEntry>,
}

impl MatchReport {
    pub fn matched_count(&self) -> usize {
        self.matches.len()
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched_products.len()
    }

    /// Orders every product's trends by confidence, highest first. Ties keep
    /// their current order.
    pub fn sort_matched_trends(&mut self) {
        for product in &mut self.matches {
            product.matched_trends.sort_by(|a, b| b.confidence.cmp(&a.confidence));
        }
    }

    /// Verifies the report against the products it was produced for.
    pub fn check_invariants(&self, products: &[ProductSummary]) -> Result<(), DomainError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let reported = self
            .matches
            .iter()
            .map(|entry| entry.product_id.as_str())
            .chain(self.unmatched_products.iter().map(|entry| entry.product_id.as_str()));
        for product_id in reported {
            *seen.entry(product_id).or_default() += 1;
        }

        let mut expected: HashMap<&str, usize> = HashMap::new();
        for product in products {
            *expected.entry(product.id.as_str()).or_default() += 1;
        }

        for product in products {
            let wanted = expected.get(product.id.as_str()).copied().unwrap_or(0);
            let found = seen.get(product.id.as_str()).copied().unwrap_or(0);
            if found != wanted {
                return Err(DomainError::PartitionViolation {
                    product_id: product.id.clone(),
                    expected: wanted,
                    found,
                });
            }
        }

        for entry in &self.matches {
            if !expected.contains_key(entry.product_id.as_str()) {
                return Err(DomainError::UnknownProduct(entry.product_id.clone()));
            }
            if entry.matched_trends.is_empty() {
                return Err(DomainError::InvariantViolation(format!(
                    "product `{}` is listed as matched without any trends",
                    entry.product_id
                )));
            }
            check_matched_trends(entry)?;
        }

        if let Some(entry) = self
            .unmatched_products
            .iter()
            .find(|entry| !expected.contains_key(entry.product_id.as_str()))
        {
            return Err(DomainError::UnknownProduct(entry.product_id.clone()));
        }

        Ok(())
    }
}

fn check_matched_trends(entry: &ProductMatchReport) -> Result<(), DomainError> {
    let mut previous = u8::MAX;
    for result in &entry.matched_trends {
        if result.confidence > MAX_CONFIDENCE {
            return Err(DomainError::ConfidenceOutOfRange {
                product_id: entry.product_id.clone(),
                trend_id: result.trend_id.clone(),
                confidence: result.confidence,
            });
        }
        if result.match_reasons.iter().all(|reason| reason.trim().is_empty()) {
            return Err(DomainError::MissingMatchReasons {
                product_id: entry.product_id.clone(),
                trend_id: result.trend_id.clone(),
            });
        }
        if result.confidence > previous {
            return Err(DomainError::InvariantViolation(format!(
                "matched trends for product `{}` are not sorted by confidence",
                entry.product_id
            )));
        }
        previous = result.confidence;
    }
    Ok(())
}

/// Which path produced a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Gemini,
    Fallback,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Fallback => "fallback",
        }
    }
}

/// Report plus the method that produced it, as handed to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub success: bool,
    pub method: MatchMethod,
    #[serde(flatten)]
    pub report: MatchReport,
}

impl MatchOutcome {
    pub fn new(method: MatchMethod, report: MatchReport) -> Self {
        Self { success: true, method, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DomainError;

    fn result(trend_id: &str, confidence: u8) -> MatchResult {
        MatchResult {
            trend_name: format!("Trend {trend_id}"),
            trend_id: trend_id.to_string(),
            confidence,
            match_reasons: vec!["keywords match: wool".to_string()],
        }
    }

    fn products() -> Vec<ProductSummary> {
        vec![
            ProductSummary::new("p1", "Classic Trench Coat", "Coats"),
            ProductSummary::new("p2", "Basic Socks", "Accessories"),
        ]
    }

    fn valid_report() -> MatchReport {
        MatchReport {
            matches: vec![ProductMatchReport {
                product_id: "p1".to_string(),
                product_title: "Classic Trench Coat".to_string(),
                product_type: "Coats".to_string(),
                matched_trends: vec![result("t1", 90), result("t2", 40)],
            }],
            unmatched_products: vec![UnmatchedEntry::for_product(&products()[1])],
        }
    }

    #[test]
    fn well_formed_report_passes_invariants() {
        assert_eq!(valid_report().check_invariants(&products()), Ok(()));
    }

    #[test]
    fn product_missing_from_both_lists_is_a_partition_violation() {
        let mut report = valid_report();
        report.unmatched_products.clear();

        assert_eq!(
            report.check_invariants(&products()),
            Err(DomainError::PartitionViolation {
                product_id: "p2".to_string(),
                expected: 1,
                found: 0
            })
        );
    }

    #[test]
    fn product_in_both_lists_is_a_partition_violation() {
        let mut report = valid_report();
        report.unmatched_products.push(UnmatchedEntry::for_product(&products()[0]));

        assert!(matches!(
            report.check_invariants(&products()),
            Err(DomainError::PartitionViolation { found: 2, .. })
        ));
    }

    #[test]
    fn unknown_product_is_rejected() {
        let mut report = valid_report();
        report.unmatched_products.push(UnmatchedEntry {
            product_id: "ghost".to_string(),
            product_title: "Ghost".to_string(),
            reason: UNMATCHED_REASON.to_string(),
        });

        assert_eq!(
            report.check_invariants(&products()),
            Err(DomainError::UnknownProduct("ghost".to_string()))
        );
    }

    #[test]
    fn confidence_above_hundred_is_rejected() {
        let mut report = valid_report();
        report.matches[0].matched_trends[0].confidence = 120;

        assert!(matches!(
            report.check_invariants(&products()),
            Err(DomainError::ConfidenceOutOfRange { confidence: 120, .. })
        ));
    }

    #[test]
    fn empty_reasons_are_rejected() {
        let mut report = valid_report();
        report.matches[0].matched_trends[1].match_reasons.clear();

        assert!(matches!(
            report.check_invariants(&products()),
            Err(DomainError::MissingMatchReasons { .. })
        ));
    }

    #[test]
    fn sort_restores_descending_confidence() {
        let mut report = valid_report();
        report.matches[0].matched_trends.reverse();
        assert!(report.check_invariants(&products()).is_err());

        report.sort_matched_trends();
        let order: Vec<u8> =
            report.matches[0].matched_trends.iter().map(|trend| trend.confidence).collect();
        assert_eq!(order, vec![90, 40]);
        assert_eq!(report.check_invariants(&products()), Ok(()));
    }

    #[test]
    fn outcome_flattens_report_next_to_method() {
        let outcome = MatchOutcome::new(MatchMethod::Fallback, valid_report());
        let value = serde_json::to_value(&outcome).expect("outcome should serialize");

        assert_eq!(value["method"], "fallback");
        assert_eq!(value["success"], true);
        assert_eq!(value["matches"][0]["matched_trends"][0]["confidence"], 90);
        assert_eq!(value["unmatched_products"][0]["reason"], UNMATCHED_REASON);
    }
}
