use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    trendfit_cli::run().await
}
