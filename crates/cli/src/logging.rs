use tracing_subscriber::EnvFilter;
use trendfit_core::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber. Events go to stderr so stdout stays
/// reserved for the JSON document a command prints.
///
/// `RUST_LOG` wins over `logging.level` when set. Calling this twice is a
/// no-op.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
