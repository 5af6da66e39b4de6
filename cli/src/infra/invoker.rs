//! Infrastructure implementation of the `FunctionInvoker` port.
//!
//! Calls the synchronous invocation API through `aws lambda invoke`. The
//! function result is written to a temporary file; the CLI prints the
//! invocation metadata (status, function error, base64 log tail) on stdout.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::Value;

use crate::application::ports::{CommandRunner, FunctionInvoker};
use crate::domain::invocation::INVOCATION_TIMEOUT;
use crate::domain::{InvocationError, InvocationRequest, InvocationResponse};
use crate::infra::command_runner::TokioCommandRunner;

/// AWS CLI executable.
pub const AWS: &str = "aws";

/// Extra time granted to the CLI process so its own read timeout fires first.
const CLI_GRACE: Duration = Duration::from_secs(30);

/// Production invoker shelling out to the AWS CLI.
pub struct AwsCliInvoker<R = TokioCommandRunner> {
    runner: R,
}

impl AwsCliInvoker<TokioCommandRunner> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_runner(TokioCommandRunner::new(INVOCATION_TIMEOUT + CLI_GRACE))
    }
}

impl Default for AwsCliInvoker<TokioCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> AwsCliInvoker<R> {
    #[must_use]
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }
}

/// Arguments for `aws lambda invoke`, with the result written to `outfile`.
#[must_use]
pub fn invoke_args(request: &InvocationRequest, outfile: &str) -> Vec<String> {
    vec![
        "lambda".to_string(),
        "invoke".to_string(),
        "--function-name".to_string(),
        request.function_name.clone(),
        "--region".to_string(),
        request.settings.region.clone(),
        "--profile".to_string(),
        request.settings.profile.clone(),
        "--invocation-type".to_string(),
        "RequestResponse".to_string(),
        "--log-type".to_string(),
        "Tail".to_string(),
        "--cli-binary-format".to_string(),
        "raw-in-base64-out".to_string(),
        "--cli-read-timeout".to_string(),
        INVOCATION_TIMEOUT.as_secs().to_string(),
        "--payload".to_string(),
        request.payload(),
        outfile.to_string(),
    ]
}

impl<R: CommandRunner> FunctionInvoker for AwsCliInvoker<R> {
    async fn invoke(
        &self,
        request: &InvocationRequest,
    ) -> Result<InvocationResponse, InvocationError> {
        let outfile = tempfile::NamedTempFile::new()
            .map_err(|e| transport(format!("cannot create a temporary file: {e}")))?;
        let outfile_path = outfile.path().to_string_lossy().into_owned();

        let args = invoke_args(request, &outfile_path);
        let argv: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self
            .runner
            .run(AWS, &argv)
            .await
            .map_err(|e| transport(format!("{e:#}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(transport(if stderr.is_empty() {
                format!(
                    "aws lambda invoke failed (exit code {})",
                    output.status.code().unwrap_or(1)
                )
            } else {
                stderr
            }));
        }

        let payload = tokio::fs::read(outfile.path())
            .await
            .map_err(|e| transport(format!("cannot read the invocation result: {e}")))?;
        parse_invoke_output(&output.stdout, &payload)
    }
}

/// Metadata printed by `aws lambda invoke`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvokeMetadata {
    #[serde(default)]
    status_code: Option<u16>,
    #[serde(default)]
    function_error: Option<String>,
    #[serde(default)]
    log_result: Option<String>,
}

/// Combine the CLI metadata and the raw function result.
///
/// # Errors
///
/// Returns [`InvocationError::Remote`] when the function reported an error
/// and [`InvocationError::Transport`] when either document is not valid JSON.
pub fn parse_invoke_output(
    metadata: &[u8],
    payload: &[u8],
) -> Result<InvocationResponse, InvocationError> {
    let metadata: InvokeMetadata = serde_json::from_slice(metadata)
        .map_err(|e| transport(format!("unexpected aws lambda invoke output: {e}")))?;
    tracing::debug!(status = ?metadata.status_code, error = ?metadata.function_error, "invocation returned");

    let logs = metadata
        .log_result
        .as_deref()
        .map(decode_logs)
        .unwrap_or_default();

    let payload: Value = if payload.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(payload)
            .map_err(|e| transport(format!("invocation result is not valid JSON: {e}")))?
    };

    if let Some(kind) = metadata.function_error {
        let message = payload
            .get("errorMessage")
            .and_then(Value::as_str)
            .map_or(kind, str::to_string);
        return Err(InvocationError::Remote { logs, message });
    }

    Ok(InvocationResponse { payload, logs })
}

fn decode_logs(encoded: &str) -> String {
    match BASE64.decode(encoded) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => encoded.to_string(),
    }
}

fn transport(message: String) -> InvocationError {
    InvocationError::Transport { message }
}
