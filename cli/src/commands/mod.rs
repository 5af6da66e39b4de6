//! Command implementations

pub mod cli_invoke;
pub mod config;
pub mod dashboard;
pub mod version;

use std::process::ExitCode;

/// Map a forwarded exit status onto the local process exit code.
///
/// Statuses outside `0..=255` are truncated the way a shell would report them.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code as u8)
}
