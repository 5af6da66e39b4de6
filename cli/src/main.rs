//! lambdaphp - deployment assistant for serverless PHP applications

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lambdaphp_cli::cli::Cli;
use lambdaphp_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            let message = format!("{e:#}");
            match format_error(&message, "error").ok().filter(|_| json) {
                Some(obj) => println!("{obj}"),
                None => eprintln!("Error: {message}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so forwarded command output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
