//! Application service — run a console command inside a deployed function.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{FunctionInvoker, ProgressReporter, StreamSink};
use crate::domain::invocation::{self, InvocationRequest};
use crate::domain::StreamOrigin;

/// Invoke the function once and forward its result.
///
/// Returns the exit code the local process should exit with. Invocation
/// failures are reported through `reporter` and `sink`, never retried.
pub async fn invoke_remote(
    invoker: &impl FunctionInvoker,
    reporter: &impl ProgressReporter,
    sink: &impl StreamSink,
    request: &InvocationRequest,
) -> i32 {
    tracing::debug!(
        function = %request.function_name,
        region = %request.settings.region,
        profile = %request.settings.profile,
        command = request.command(),
        "invoking function",
    );

    let outcome = invoker.invoke(request).await;
    if let Err(e) = &outcome {
        tracing::debug!(error = %e, "invocation failed");
    }
    let report = invocation::interpret(outcome);

    if !report.stderr.is_empty() {
        sink.write(StreamOrigin::Stderr, report.stderr.as_bytes());
    }
    if let Some(message) = &report.error {
        reporter.error(message);
    }
    if !report.stdout.is_empty() {
        sink.write(StreamOrigin::Stdout, report.stdout.as_bytes());
    }

    report.exit_code
}
