//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly. Everything goes to stderr; stdout carries
//! only forwarded command output.

use indicatif::ProgressBar;

use crate::application::ports::{ProgressReporter, Spinner};
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ⚠ {message}"` (suppressed when `ctx.quiet`)
/// - `error()` prints `"  ✗ {message}"` (never suppressed)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    type Spinner = TerminalSpinner;

    fn success(&self, message: &str) {
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        self.ctx.warn(message);
    }

    fn error(&self, message: &str) {
        self.ctx.error(message);
    }

    fn spinner(&self, message: &str) -> TerminalSpinner {
        let pb = if self.ctx.show_progress() {
            progress::spinner(message)
        } else {
            progress::hidden()
        };
        TerminalSpinner { pb }
    }
}

/// `indicatif` spinner advanced once per poll.
pub struct TerminalSpinner {
    pb: ProgressBar,
}

impl Spinner for TerminalSpinner {
    fn tick(&self) {
        self.pb.tick();
    }

    fn clear(&self) {
        self.pb.finish_and_clear();
    }
}
