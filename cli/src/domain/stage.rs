//! Per-stage state machine for supervised subprocesses.
//!
//! A stage starts in `Starting`, moves to `Polling` on every observation that
//! is not terminal, and ends in either `ReadyOrDone` or `Failed`. Terminal
//! states absorb further observations.

/// What ends a stage successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The process exits with status 0.
    Exit,
    /// The combined output contains the marker while the process is still running.
    Marker(&'static str),
}

/// Successful end of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEnd {
    Ready,
    Exited(i32),
}

/// Unsuccessful end of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageFailure {
    /// The process exited with a non-zero status.
    ExitedUnsuccessfully(i32),
    /// The process stopped before printing the readiness marker.
    StoppedBeforeReady(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageState {
    Starting,
    Polling { polls: u32 },
    ReadyOrDone(StageEnd),
    Failed(StageFailure),
}

/// One look at a running process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Observation {
    /// `Some(code)` once the process has exited.
    pub exit_code: Option<i32>,
    /// Whether the readiness marker appears in the output captured so far.
    pub marker_seen: bool,
}

#[derive(Debug, Clone)]
pub struct StageMachine {
    completion: Completion,
    state: StageState,
}

impl StageMachine {
    #[must_use]
    pub fn new(completion: Completion) -> Self {
        Self {
            completion,
            state: StageState::Starting,
        }
    }

    #[must_use]
    pub fn state(&self) -> StageState {
        self.state
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            StageState::ReadyOrDone(_) | StageState::Failed(_)
        )
    }

    /// Feed one observation and return the resulting state.
    pub fn observe(&mut self, observation: Observation) -> StageState {
        if self.is_terminal() {
            return self.state;
        }
        self.state = match (self.completion, observation) {
            (Completion::Marker(_), Observation { marker_seen: true, .. }) => {
                StageState::ReadyOrDone(StageEnd::Ready)
            }
            (Completion::Marker(_), Observation { exit_code: Some(code), .. }) => {
                StageState::Failed(StageFailure::StoppedBeforeReady(code))
            }
            (Completion::Exit, Observation { exit_code: Some(0), .. }) => {
                StageState::ReadyOrDone(StageEnd::Exited(0))
            }
            (Completion::Exit, Observation { exit_code: Some(code), .. }) => {
                StageState::Failed(StageFailure::ExitedUnsuccessfully(code))
            }
            (_, Observation { exit_code: None, .. }) => StageState::Polling {
                polls: match self.state {
                    StageState::Polling { polls } => polls.saturating_add(1),
                    _ => 1,
                },
            },
        };
        self.state
    }
}
