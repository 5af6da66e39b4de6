//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod invocation;
pub mod process;
pub mod stage;

pub use config::{AwsSettings, DashboardOverrides, DashboardSettings, LambdaphpConfig};
pub use error::{ConfigError, DashboardError, InvocationError, InvokeError};
pub use invocation::{InvocationRequest, InvocationResponse, InvokeReport};
pub use process::{CapturedOutput, StreamOrigin};
pub use stage::{Completion, Observation, StageEnd, StageFailure, StageMachine, StageState};
