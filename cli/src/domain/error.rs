//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Invocation errors ─────────────────────────────────────────────────────────

/// Errors raised before a remote invocation is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvokeError {
    #[error("Function name must not be empty.")]
    EmptyFunctionName,

    #[error("Argument cannot be passed to the remote shell: {0:?}")]
    UnquotableArgument(String),
}

/// Failure of the function-invocation call itself.
///
/// Both variants carry whatever remote logs were captured at failure time so
/// the caller can surface them without re-running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvocationError {
    /// The function ran and reported an error (unhandled exception, timeout, ...).
    #[error("{message}")]
    Remote { logs: String, message: String },

    /// The invocation API could not be reached or rejected the call.
    #[error("{message}")]
    Transport { message: String },
}

impl InvocationError {
    /// Remote execution logs captured with the failure (empty for transport errors).
    #[must_use]
    pub fn logs(&self) -> &str {
        match self {
            Self::Remote { logs, .. } => logs,
            Self::Transport { .. } => "",
        }
    }
}

// ── Dashboard errors ──────────────────────────────────────────────────────────

/// Errors that halt the dashboard bootstrap sequence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("No {0} found in the current directory. Run this command from your project root.")]
    MissingDescriptor(String),

    #[error("{tool} is not installed or not in PATH.\n\n{install_hint}")]
    MissingTool {
        tool: String,
        install_hint: String,
    },

    #[error("{stage} failed (exit code {code}):\n{output}")]
    StageFailed {
        stage: String,
        code: i32,
        output: String,
    },

    #[error("Could not find '{field}' in the output of `serverless info`. Is the stack deployed?")]
    MissingStackField { field: String },

    #[error("The dashboard container stopped before it was ready (exit code {code}):\n{output}")]
    StartupFailed { code: i32, output: String },

    #[error("Dashboard cancelled.")]
    Cancelled,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
