use std::path::Path;

use serde::Serialize;
use trendfit_core::config::AppConfig;
use trendfit_core::errors::ApplicationError;
use trendfit_core::{PairScore, TrendMatcher};

use super::{load_catalog, load_library, CommandResult};

const COMMAND: &str = "explain";

#[derive(Debug, Serialize)]
struct Explanation {
    product_id: String,
    product_title: String,
    threshold: u32,
    scores: Vec<PairScore>,
}

/// Rule-based score of one product against every trend, including pairs that
/// stay below the threshold.
pub fn run(config: &AppConfig, product_id: &str, products_path: &Path) -> CommandResult {
    match execute(config, product_id, products_path) {
        Ok(explanation) => CommandResult::data(COMMAND, &explanation),
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

fn execute(
    config: &AppConfig,
    product_id: &str,
    products_path: &Path,
) -> Result<Explanation, ApplicationError> {
    let products = load_catalog(products_path)?;
    let product = products
        .iter()
        .find(|product| product.id == product_id)
        .ok_or_else(|| ApplicationError::Input(format!("product `{product_id}` not found")))?;
    let library = load_library(config)?;

    let matcher = TrendMatcher::new();
    let scores =
        library.trends().iter().map(|trend| matcher.score_pair(product, trend)).collect();

    Ok(Explanation {
        product_id: product.id.clone(),
        product_title: product.title.clone(),
        threshold: matcher.weights().threshold,
        scores,
    })
}
