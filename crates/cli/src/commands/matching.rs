use std::path::Path;
use std::sync::Arc;

use tracing::debug;
use trendfit_agent::{GeminiClient, TrendMatchService};
use trendfit_core::config::AppConfig;
use trendfit_core::errors::ApplicationError;
use trendfit_core::MatchOutcome;

use super::{load_catalog, load_library, CommandResult};

const COMMAND: &str = "match";

pub async fn run(config: &AppConfig, products_path: &Path) -> CommandResult {
    match execute(config, products_path).await {
        Ok(outcome) => CommandResult::data(COMMAND, &outcome),
        Err(error) => CommandResult::from_error(COMMAND, error),
    }
}

async fn execute(
    config: &AppConfig,
    products_path: &Path,
) -> Result<MatchOutcome, ApplicationError> {
    let products = load_catalog(products_path)?;
    let library = load_library(config)?;
    let service = build_service(config)?;
    debug!(
        event_name = "command.match.inputs_loaded",
        products = products.len(),
        trends = library.len(),
        ai_enabled = config.ai_enabled(),
        "match inputs loaded"
    );

    Ok(service.find_matches(&products, library.trends()).await)
}

fn build_service(config: &AppConfig) -> Result<TrendMatchService, ApplicationError> {
    if !config.ai_enabled() {
        return Ok(TrendMatchService::rule_based());
    }

    let client = GeminiClient::from_config(&config.llm)
        .map_err(|error| ApplicationError::Integration(format!("{error:#}")))?;
    Ok(TrendMatchService::new(Arc::new(client)))
}
