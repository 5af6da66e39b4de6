//! Remote invocation — request construction and response interpretation.
//!
//! Pure functions only. The invocation itself happens behind the
//! `FunctionInvoker` port.

use std::time::Duration;

use serde_json::Value;

use crate::domain::config::AwsSettings;
use crate::domain::error::{InvocationError, InvokeError};

/// Upper bound on a single invocation, matching the maximum remote execution time.
pub const INVOCATION_TIMEOUT: Duration = Duration::from_secs(900);

/// Exit code used whenever the remote side did not report one explicitly.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// One console command to run inside a deployed function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub function_name: String,
    pub settings: AwsSettings,
    command: String,
}

impl InvocationRequest {
    /// Build a request, escaping each argument for the remote shell.
    ///
    /// # Errors
    ///
    /// Returns [`InvokeError::EmptyFunctionName`] for an empty function name and
    /// [`InvokeError::UnquotableArgument`] when an argument cannot be quoted.
    pub fn new(
        function_name: &str,
        arguments: &[String],
        settings: AwsSettings,
    ) -> Result<Self, InvokeError> {
        if function_name.trim().is_empty() {
            return Err(InvokeError::EmptyFunctionName);
        }
        Ok(Self {
            function_name: function_name.to_string(),
            settings,
            command: escape_arguments(arguments)?,
        })
    }

    /// The escaped, space-joined command line.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Request body: the command line encoded as a JSON string.
    #[must_use]
    pub fn payload(&self) -> String {
        Value::String(self.command.clone()).to_string()
    }
}

/// Shell-escape every argument and join them with single spaces, order preserved.
///
/// # Errors
///
/// Returns [`InvokeError::UnquotableArgument`] if an argument contains a NUL byte.
pub fn escape_arguments(arguments: &[String]) -> Result<String, InvokeError> {
    let escaped = arguments
        .iter()
        .map(|arg| {
            shlex::try_quote(arg)
                .map(std::borrow::Cow::into_owned)
                .map_err(|_| InvokeError::UnquotableArgument(arg.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(escaped.join(" "))
}

/// Successful response from the invocation API.
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationResponse {
    /// JSON-decoded function result.
    pub payload: Value,
    /// Tail of the remote execution logs.
    pub logs: String,
}

/// What the local process should print and exit with after an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeReport {
    /// Written verbatim to standard output.
    pub stdout: String,
    /// Written verbatim to the diagnostic stream.
    pub stderr: String,
    /// Reported as an error line on the diagnostic stream.
    pub error: Option<String>,
    pub exit_code: i32,
}

/// Map an invocation outcome onto local output and an exit code.
///
/// - `output` present: print it, exit with `exitCode` (default 1).
/// - `output` missing: logs to stderr, pretty payload to stdout, exit 1.
/// - invocation failed: logs to stderr, message as error, exit 1.
#[must_use]
pub fn interpret(outcome: Result<InvocationResponse, InvocationError>) -> InvokeReport {
    match outcome {
        Ok(response) => match output_text(&response.payload) {
            Some(stdout) => InvokeReport {
                stdout,
                stderr: String::new(),
                error: None,
                exit_code: exit_code(&response.payload),
            },
            None => InvokeReport {
                stdout: pretty(&response.payload),
                stderr: response.logs,
                error: None,
                exit_code: FALLBACK_EXIT_CODE,
            },
        },
        Err(err) => InvokeReport {
            stdout: String::new(),
            stderr: err.logs().to_string(),
            error: Some(err.to_string()),
            exit_code: FALLBACK_EXIT_CODE,
        },
    }
}

fn output_text(payload: &Value) -> Option<String> {
    match payload.get("output")? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn exit_code(payload: &Value) -> i32 {
    payload
        .get("exitCode")
        .and_then(Value::as_i64)
        .and_then(|code| i32::try_from(code).ok())
        .unwrap_or(FALLBACK_EXIT_CODE)
}

fn pretty(payload: &Value) -> String {
    let mut text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    text.push('\n');
    text
}
