use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use trendfit_core::{
    MatchMethod, MatchOutcome, MatchReport, ProductSummary, TrendMatcher, TrendSummary,
};

use crate::llm::LlmClient;
use crate::prompt::{build_match_prompt, clean_response};

/// Why the generative path did not produce a usable report.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AiFailure {
    #[error("no generative model is configured")]
    Unavailable,
    #[error("could not build match prompt: {0}")]
    Prompt(String),
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model response is not a valid match report: {0}")]
    Parse(String),
    #[error("model report rejected: {0}")]
    InvalidReport(String),
}

/// Decodes a model reply and checks it against the inputs it was asked about.
pub fn parse_ai_report(
    raw: &str,
    products: &[ProductSummary],
    trends: &[TrendSummary],
) -> Result<MatchReport, AiFailure> {
    let mut report: MatchReport = serde_json::from_str(clean_response(raw))
        .map_err(|error| AiFailure::Parse(error.to_string()))?;

    report.sort_matched_trends();
    report.check_invariants(products).map_err(|error| AiFailure::InvalidReport(error.to_string()))?;

    let known: HashSet<&str> = trends.iter().map(|trend| trend.id.as_str()).collect();
    let unknown = report
        .matches
        .iter()
        .flat_map(|entry| entry.matched_trends.iter())
        .find(|result| !known.contains(result.trend_id.as_str()));
    if let Some(result) = unknown {
        return Err(AiFailure::InvalidReport(format!(
            "report references unknown trend `{}`",
            result.trend_id
        )));
    }

    Ok(report)
}

/// Matches products to trends, generative model first, rule-based fallback
/// second.
#[derive(Clone, Default)]
pub struct TrendMatchService {
    client: Option<Arc<dyn LlmClient>>,
    matcher: TrendMatcher,
}

impl TrendMatchService {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client: Some(client), matcher: TrendMatcher::default() }
    }

    /// Service that never calls a model.
    pub fn rule_based() -> Self {
        Self::default()
    }

    pub fn with_matcher(mut self, matcher: TrendMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn has_model(&self) -> bool {
        self.client.is_some()
    }

    pub async fn try_ai(
        &self,
        products: &[ProductSummary],
        trends: &[TrendSummary],
    ) -> Result<MatchReport, AiFailure> {
        let client = self.client.as_ref().ok_or(AiFailure::Unavailable)?;
        let prompt = build_match_prompt(products, trends)
            .map_err(|error| AiFailure::Prompt(error.to_string()))?;
        let raw = client
            .complete(&prompt)
            .await
            .map_err(|error| AiFailure::Request(format!("{error:#}")))?;

        parse_ai_report(&raw, products, trends)
    }

    pub fn rule_based_report(
        &self,
        products: &[ProductSummary],
        trends: &[TrendSummary],
    ) -> MatchReport {
        self.matcher.find_matches(products, trends)
    }

    /// Never fails: any generative failure is logged and answered by the
    /// rule-based matcher.
    pub async fn find_matches(
        &self,
        products: &[ProductSummary],
        trends: &[TrendSummary],
    ) -> MatchOutcome {
        match self.try_ai(products, trends).await {
            Ok(report) => {
                info!(
                    event_name = "matching.ai.completed",
                    products = products.len(),
                    trends = trends.len(),
                    matched = report.matched_count(),
                    "generative matching succeeded"
                );
                MatchOutcome::new(MatchMethod::Gemini, report)
            }
            Err(AiFailure::Unavailable) => {
                info!(
                    event_name = "matching.rule_based.selected",
                    products = products.len(),
                    trends = trends.len(),
                    "no generative model configured, using rule-based matching"
                );
                MatchOutcome::new(MatchMethod::Fallback, self.rule_based_report(products, trends))
            }
            Err(failure) => {
                warn!(
                    event_name = "matching.ai.fallback",
                    error = %failure,
                    products = products.len(),
                    trends = trends.len(),
                    "generative matching failed, falling back to rule-based matching"
                );
                MatchOutcome::new(MatchMethod::Fallback, self.rule_based_report(products, trends))
            }
        }
    }
}
