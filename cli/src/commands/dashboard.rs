//! `lambdaphp dashboard` — run the monitoring dashboard locally.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, env_var};
use crate::application::services::config_service;
use crate::application::services::dashboard::{self, DashboardOptions, POLL_INTERVAL};
use crate::domain::{DashboardError, DashboardOverrides, DashboardSettings};
use crate::infra::fs::{LocalFs, home_dir};
use crate::infra::host::{SystemBrowser, WhichLocator};
use crate::infra::process::TokioProcessLauncher;
use crate::output::{TerminalReporter, TerminalSink};

/// Exit code after an interrupt, as a shell reports SIGINT.
const INTERRUPTED: u8 = 130;

/// Arguments for the dashboard command.
#[derive(Args)]
pub struct DashboardArgs {
    /// Host the dashboard is published on
    #[arg(long)]
    pub host: Option<String>,

    /// Port the dashboard is published on
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// AWS credential profile (defaults to AWS_PROFILE, then config)
    #[arg(long)]
    pub profile: Option<String>,

    /// Deployment stage to inspect
    #[arg(long)]
    pub stage: Option<String>,
}

/// Bootstrap the dashboard and exit with the container's exit code.
///
/// # Errors
///
/// Returns an error for any failed bootstrap stage (missing tool or
/// descriptor, failed subprocess, container stopped before ready).
pub async fn run(app: &AppContext, args: DashboardArgs) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let overrides = DashboardOverrides {
        host: args.host,
        port: args.port,
        profile: args.profile,
        stage: args.stage,
    };
    let settings = DashboardSettings::resolve(&overrides, &config, env_var, &home_dir()?);
    let project_dir = std::env::current_dir().context("cannot read the current directory")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let reporter = TerminalReporter::new(&app.output);
    let result = dashboard::bootstrap_dashboard(
        &TokioProcessLauncher,
        &WhichLocator,
        &LocalFs,
        &SystemBrowser,
        &reporter,
        &TerminalSink,
        DashboardOptions {
            settings: &settings,
            project_dir: &project_dir,
            poll_interval: POLL_INTERVAL,
            cancel,
        },
    )
    .await;

    match result {
        Ok(code) => Ok(super::exit_code(code)),
        Err(e) if matches!(e.downcast_ref::<DashboardError>(), Some(DashboardError::Cancelled)) => {
            app.output.warn("Dashboard stopped.");
            Ok(ExitCode::from(INTERRUPTED))
        }
        Err(e) => Err(e),
    }
}
