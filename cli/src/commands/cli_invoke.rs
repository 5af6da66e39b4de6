//! `lambdaphp cli` — run a console command inside a deployed function.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, env_var};
use crate::application::services::{config_service, remote_invoke};
use crate::domain::{AwsSettings, InvocationRequest};
use crate::infra::invoker::AwsCliInvoker;
use crate::output::{TerminalReporter, TerminalSink};

/// Arguments for the cli command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct CliArgs {
    /// Name of the deployed console function
    pub function: String,

    /// AWS region (defaults to AWS_DEFAULT_REGION / AWS_REGION, then config)
    #[arg(long)]
    pub region: Option<String>,

    /// AWS credential profile (defaults to AWS_PROFILE, then config)
    #[arg(long)]
    pub profile: Option<String>,

    /// Command and arguments to run remotely
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Invoke the function and exit with the remote command's exit code.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or the arguments
/// cannot be encoded. Invocation failures are reported and mapped to exit
/// code 1 instead.
pub async fn run(app: &AppContext, args: CliArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let settings = AwsSettings::resolve(
        args.region.as_deref(),
        args.profile.as_deref(),
        &config.aws,
        env_var,
    );
    let request = InvocationRequest::new(&args.function, &args.args, settings)?;

    let reporter = TerminalReporter::new(&app.output);
    let code = remote_invoke::invoke_remote(
        &AwsCliInvoker::new(),
        &reporter,
        &TerminalSink,
        &request,
    )
    .await;
    Ok(super::exit_code(code))
}
