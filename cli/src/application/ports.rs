//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::{
    CapturedOutput, InvocationError, InvocationRequest, InvocationResponse, LambdaphpConfig,
    StreamOrigin,
};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts one-shot process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Process Supervision Ports ─────────────────────────────────────────────────

/// A launched subprocess owned by exactly one bootstrap stage.
#[allow(async_fn_in_trait)]
pub trait ProcessHandle {
    /// Non-blocking check. Returns `Some(code)` once the process has exited
    /// and all of its output has been captured.
    fn try_exit_code(&mut self) -> Result<Option<i32>>;
    /// Output captured up to the last `try_exit_code` call.
    fn captured(&self) -> &CapturedOutput;
    /// Terminate the process and reap it.
    async fn kill(&mut self) -> Result<()>;
    /// Forward new output chunk by chunk until the process exits, then return
    /// its exit code.
    async fn wait_streaming(
        &mut self,
        on_chunk: impl FnMut(StreamOrigin, &[u8]),
    ) -> Result<i32>;
}

/// Starts subprocesses with piped output.
pub trait ProcessLauncher {
    type Handle: ProcessHandle;

    /// Spawn `program` with `args` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    fn launch(&self, program: &str, args: &[String]) -> Result<Self::Handle>;
}

// ── Host Environment Ports ────────────────────────────────────────────────────

/// Resolves executables on the search path.
pub trait ToolLocator {
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Abstracts filesystem existence checks.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
}

/// Opens URLs in the user's default browser.
pub trait BrowserOpener {
    /// # Errors
    ///
    /// Returns an error if no browser could be launched.
    fn open(&self, url: &str) -> Result<()>;
}

// ── Invocation Port ───────────────────────────────────────────────────────────

/// Synchronous function-invocation API bound to a region and profile.
#[allow(async_fn_in_trait)]
pub trait FunctionInvoker {
    /// Invoke the function once and wait for its result.
    async fn invoke(
        &self,
        request: &InvocationRequest,
    ) -> std::result::Result<InvocationResponse, InvocationError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Indeterminate progress indicator redrawn on every poll.
pub trait Spinner {
    fn tick(&self);
    /// Remove the indicator from the terminal.
    fn clear(&self);
}

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    type Spinner: Spinner;

    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit an error message. Never suppressed.
    fn error(&self, message: &str);
    /// Start a spinner labelled `message`.
    fn spinner(&self, message: &str) -> Self::Spinner;
}

/// Destination for raw output forwarded to the local stdout/stderr.
pub trait StreamSink {
    fn write(&self, origin: StreamOrigin, bytes: &[u8]);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts persistence of `LambdaphpConfig`.
pub trait ConfigStore {
    /// Load the config, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<LambdaphpConfig>;
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn save(&self, config: &LambdaphpConfig) -> Result<()>;
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    fn path(&self) -> Result<PathBuf>;
}
