//! Application service — bootstrap the local dashboard container.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! Stages run strictly in sequence: preconditions, stack metadata query,
//! image refresh, container launch. Each subprocess is owned by the stage
//! that launched it and is killed if the cancellation token fires.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    BrowserOpener, LocalFs, ProcessHandle, ProcessLauncher, ProgressReporter, Spinner,
    StreamSink, ToolLocator,
};
use crate::domain::dashboard::{
    self, DESCRIPTOR_FILE, READINESS_MARKER, REQUIRED_TOOLS, StackInfo,
};
use crate::domain::{
    Completion, DashboardError, DashboardSettings, Observation, StageFailure, StageMachine,
    StageState, StreamOrigin,
};

/// Delay between two observations of a running subprocess.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct DashboardOptions<'a> {
    pub settings: &'a DashboardSettings,
    /// Directory expected to contain the deployment descriptor.
    pub project_dir: &'a Path,
    pub poll_interval: Duration,
    pub cancel: CancellationToken,
}

/// Run the full bootstrap and return the container's exit code.
///
/// # Errors
///
/// Returns a [`DashboardError`] (wrapped in `anyhow`) for every terminal
/// failure, or an I/O error if a subprocess cannot be spawned or observed.
pub async fn bootstrap_dashboard<L: ProcessLauncher>(
    launcher: &L,
    tools: &impl ToolLocator,
    local_fs: &impl LocalFs,
    browser: &impl BrowserOpener,
    reporter: &impl ProgressReporter,
    sink: &impl StreamSink,
    opts: DashboardOptions<'_>,
) -> Result<i32> {
    let DashboardOptions {
        settings,
        project_dir,
        poll_interval,
        cancel,
    } = opts;
    let poll = Poll {
        interval: poll_interval,
        cancel: &cancel,
    };

    check_preconditions(tools, local_fs, project_dir)?;

    // Stage 2: stack metadata.
    let stack = query_stack(launcher, reporter, settings, &poll).await?;
    tracing::debug!(region = %stack.region, stack = %stack.stack, "stack resolved");

    // Stage 3: image refresh.
    let mut pull = launcher.launch(DOCKER, &dashboard::image_pull_args(settings))?;
    let state = poll
        .supervise(&mut pull, Completion::Exit, reporter, "Pulling the latest dashboard image")
        .await?;
    if let StageState::Failed(failure) = state {
        return Err(stage_failed("docker pull", failure, &pull).into());
    }
    drop(pull);

    // Stage 4: container launch and readiness wait.
    let mut container =
        launcher.launch(DOCKER, &dashboard::container_run_args(settings, &stack))?;
    let state = poll
        .supervise(
            &mut container,
            Completion::Marker(READINESS_MARKER),
            reporter,
            "Starting the dashboard",
        )
        .await?;
    if let StageState::Failed(failure) = state {
        let code = failure_code(failure);
        return Err(DashboardError::StartupFailed {
            code,
            output: container.captured().combined_text(),
        }
        .into());
    }

    let url = settings.url();
    reporter.success(&format!("Dashboard started: {url}"));
    if let Err(e) = browser.open(&url) {
        tracing::debug!(error = %e, "browser open failed");
        reporter.warn(&format!("Could not open a browser. Visit {url}"));
    }

    stream_until_exit(&mut container, sink, &cancel).await
}

const DOCKER: &str = dashboard::DOCKER.name;
const SERVERLESS: &str = dashboard::SERVERLESS.name;

/// Stage 1: descriptor file and required executables.
fn check_preconditions(
    tools: &impl ToolLocator,
    local_fs: &impl LocalFs,
    project_dir: &Path,
) -> Result<(), DashboardError> {
    if !local_fs.exists(&project_dir.join(DESCRIPTOR_FILE)) {
        return Err(DashboardError::MissingDescriptor(DESCRIPTOR_FILE.to_string()));
    }
    for tool in REQUIRED_TOOLS {
        match tools.locate(tool.name) {
            Some(path) => tracing::debug!(tool = tool.name, path = %path.display(), "found"),
            None => return Err(tool.missing()),
        }
    }
    Ok(())
}

async fn query_stack<L: ProcessLauncher>(
    launcher: &L,
    reporter: &impl ProgressReporter,
    settings: &DashboardSettings,
    poll: &Poll<'_>,
) -> Result<StackInfo> {
    let mut info = launcher.launch(SERVERLESS, &dashboard::metadata_query_args(settings))?;
    let state = poll
        .supervise(&mut info, Completion::Exit, reporter, "Retrieving the stack information")
        .await?;
    if let StageState::Failed(failure) = state {
        return Err(stage_failed("serverless info", failure, &info).into());
    }
    Ok(StackInfo::parse(&info.captured().stdout_text())?)
}

fn stage_failed(stage: &str, failure: StageFailure, handle: &impl ProcessHandle) -> DashboardError {
    DashboardError::StageFailed {
        stage: stage.to_string(),
        code: failure_code(failure),
        output: handle.captured().combined_text(),
    }
}

fn failure_code(failure: StageFailure) -> i32 {
    match failure {
        StageFailure::ExitedUnsuccessfully(code) | StageFailure::StoppedBeforeReady(code) => code,
    }
}

/// Fixed-cadence polling shared by every stage.
struct Poll<'a> {
    interval: Duration,
    cancel: &'a CancellationToken,
}

impl Poll<'_> {
    /// Observe `handle` on every tick until the stage machine reaches a
    /// terminal state. Kills the process if cancellation fires first.
    async fn supervise(
        &self,
        handle: &mut impl ProcessHandle,
        completion: Completion,
        reporter: &impl ProgressReporter,
        label: &str,
    ) -> Result<StageState> {
        let spinner = reporter.spinner(label);
        let result = self.poll_until_terminal(handle, completion, &spinner, label).await;
        spinner.clear();

        if matches!(result, Ok(StageState::ReadyOrDone(_))) {
            reporter.success(label);
        }
        result
    }

    async fn poll_until_terminal(
        &self,
        handle: &mut impl ProcessHandle,
        completion: Completion,
        spinner: &impl Spinner,
        label: &str,
    ) -> Result<StageState> {
        let mut machine = StageMachine::new(completion);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let cancelled = tokio::select! {
                biased;
                () = self.cancel.cancelled() => true,
                _ = ticker.tick() => false,
            };
            if cancelled {
                tracing::debug!(stage = label, "cancelled, killing subprocess");
                handle.kill().await.context("terminating subprocess")?;
                return Err(DashboardError::Cancelled.into());
            }

            let exit_code = handle.try_exit_code()?;
            let marker_seen = match completion {
                Completion::Marker(marker) => handle.captured().contains(marker),
                Completion::Exit => false,
            };
            let state = machine.observe(Observation {
                exit_code,
                marker_seen,
            });
            tracing::trace!(stage = label, ?state, "observed");

            if machine.is_terminal() {
                tracing::debug!(stage = label, ?state, "stage finished");
                return Ok(state);
            }
            spinner.tick();
        }
    }
}

/// Forward tagged live output until the container exits.
async fn stream_until_exit(
    container: &mut impl ProcessHandle,
    sink: &impl StreamSink,
    cancel: &CancellationToken,
) -> Result<i32> {
    let forward = |origin: StreamOrigin, chunk: &[u8]| {
        let mut tagged = origin.tag().as_bytes().to_vec();
        tagged.extend_from_slice(chunk);
        sink.write(origin, &tagged);
    };

    let exited = tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        code = container.wait_streaming(forward) => Some(code),
    };

    match exited {
        Some(code) => {
            let code = code.context("waiting for the dashboard container")?;
            tracing::debug!(code, "dashboard container exited");
            Ok(code)
        }
        None => {
            container.kill().await.context("terminating dashboard container")?;
            Err(DashboardError::Cancelled.into())
        }
    }
}
