pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use trendfit_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use trendfit_core::errors::ApplicationError;

#[derive(Debug, Parser)]
#[command(
    name = "trendfit",
    about = "Trend-to-product matching CLI",
    long_about = "Match catalog products to current trends, inspect per-trend scores, browse the trend library, and inspect configuration.",
    after_help = "Examples:\n  trendfit match --products products.json\n  trendfit match --products products.json --no-ai\n  trendfit explain --product gid://shopify/Product/1 --products products.json\n  trendfit trends --platform TikTok --top 5\n  trendfit config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Match products to trends and print the match report")]
    Match {
        #[arg(long, help = "Product summaries or a catalog export (JSON)")]
        products: PathBuf,
        #[arg(long, help = "Trend document, overrides matching.trends_path")]
        trends: Option<PathBuf>,
        #[arg(long, help = "Skip the generative model and use rule-based matching only")]
        no_ai: bool,
    },
    #[command(about = "Show the rule-based score of one product against every trend")]
    Explain {
        #[arg(long, help = "Product id to explain")]
        product: String,
        #[arg(long, help = "Product summaries or a catalog export (JSON)")]
        products: PathBuf,
        #[arg(long, help = "Trend document, overrides matching.trends_path")]
        trends: Option<PathBuf>,
    },
    #[command(about = "List trends from the trend library")]
    Trends {
        #[arg(long, help = "Only trends active on this platform (exact name)")]
        platform: Option<String>,
        #[arg(long, help = "Only the N most popular trends")]
        top: Option<usize>,
        #[arg(long, help = "Trend document, overrides matching.trends_path")]
        trends: Option<PathBuf>,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Match { .. } => "match",
            Self::Explain { .. } => "explain",
            Self::Trends { .. } => "trends",
            Self::Config => "config",
        }
    }

    fn overrides(&self) -> ConfigOverrides {
        match self {
            Self::Match { trends, no_ai, .. } => ConfigOverrides {
                trends_path: trends.clone(),
                use_ai: no_ai.then_some(false),
                ..ConfigOverrides::default()
            },
            Self::Explain { trends, .. } | Self::Trends { trends, .. } => {
                ConfigOverrides { trends_path: trends.clone(), ..ConfigOverrides::default() }
            }
            Self::Config => ConfigOverrides::default(),
        }
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let result = execute(cli.command).await;

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

async fn execute(command: Command) -> commands::CommandResult {
    let options = LoadOptions { overrides: command.overrides(), ..LoadOptions::default() };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return commands::CommandResult::from_error(
                command.name(),
                ApplicationError::Configuration(error.to_string()),
            )
        }
    };
    logging::init(&config.logging);

    match command {
        Command::Match { products, .. } => commands::matching::run(&config, &products).await,
        Command::Explain { product, products, .. } => {
            commands::explain::run(&config, &product, &products)
        }
        Command::Trends { platform, top, .. } => {
            commands::trends::run(&config, platform.as_deref(), top)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run(&config) }
        }
    }
}
