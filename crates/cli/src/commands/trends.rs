use serde::Serialize;
use trendfit_core::config::AppConfig;
use trendfit_core::TrendSummary;

use super::{load_library, CommandResult};

const COMMAND: &str = "trends";

#[derive(Debug, Serialize)]
struct TrendListing<'a> {
    count: usize,
    trends: Vec<&'a TrendSummary>,
}

/// Lists library trends, optionally narrowed to one platform and then to the
/// `top` most popular.
pub fn run(config: &AppConfig, platform: Option<&str>, top: Option<usize>) -> CommandResult {
    let library = match load_library(config) {
        Ok(library) => library,
        Err(error) => return CommandResult::from_error(COMMAND, error),
    };

    let mut trends = match platform {
        Some(platform) => library.by_platform(platform),
        None => library.trends().iter().collect(),
    };
    if let Some(limit) = top {
        trends.sort_by(|a, b| b.popularity_score.cmp(&a.popularity_score));
        trends.truncate(limit);
    }

    CommandResult::data(COMMAND, &TrendListing { count: trends.len(), trends })
}
