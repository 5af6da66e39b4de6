//! Dashboard bootstrap — constants, stack metadata extraction, and the
//! argument lists handed to `serverless` and `docker`.
//!
//! Pure functions only — no I/O, no async.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::config::DashboardSettings;
use crate::domain::error::DashboardError;

/// Deployment descriptor whose presence gates the dashboard command.
pub const DESCRIPTOR_FILE: &str = "serverless.yml";

/// Printed by the dashboard container once its web server accepts requests.
pub const READINESS_MARKER: &str = "Development Server (http://0.0.0.0:8000) started";

/// Port the dashboard listens on inside the container.
pub const CONTAINER_PORT: u16 = 8000;

/// Where the credentials directory is mounted inside the container.
pub const CONTAINER_CREDENTIALS_DIR: &str = "/root/.aws";

/// An executable the dashboard needs on `PATH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredTool {
    pub name: &'static str,
    pub install_hint: &'static str,
}

pub const DOCKER: RequiredTool = RequiredTool {
    name: "docker",
    install_hint: "Install Docker: https://docs.docker.com/get-docker/",
};

pub const SERVERLESS: RequiredTool = RequiredTool {
    name: "serverless",
    install_hint: "Install the Serverless Framework: npm install -g serverless",
};

/// Checked in this order before any subprocess is launched.
pub const REQUIRED_TOOLS: &[RequiredTool] = &[DOCKER, SERVERLESS];

impl RequiredTool {
    /// Error reported when the tool cannot be resolved.
    #[must_use]
    pub fn missing(&self) -> DashboardError {
        DashboardError::MissingTool {
            tool: self.name.to_string(),
            install_hint: self.install_hint.to_string(),
        }
    }
}

static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"region:[ \t]*([a-z0-9-]+)").expect("valid regex")
});

static STACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"stack:[ \t]*([A-Za-z0-9-]+)").expect("valid regex")
});

/// Region and `CloudFormation` stack name of a deployed service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackInfo {
    pub region: String,
    pub stack: String,
}

impl StackInfo {
    /// Extract `region: <token>` and `stack: <token>` from `serverless info` output.
    /// The token must sit on the same line as its marker.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::MissingStackField`] naming the first marker
    /// that does not appear in `text`.
    pub fn parse(text: &str) -> Result<Self, DashboardError> {
        let region = capture(&REGION_RE, text, "region")?;
        let stack = capture(&STACK_RE, text, "stack")?;
        Ok(Self { region, stack })
    }
}

fn capture(re: &Regex, text: &str, field: &str) -> Result<String, DashboardError> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DashboardError::MissingStackField {
            field: field.to_string(),
        })
}

/// `serverless info --stage <stage> --aws-profile <profile>`
#[must_use]
pub fn metadata_query_args(settings: &DashboardSettings) -> Vec<String> {
    vec![
        "info".to_string(),
        "--stage".to_string(),
        settings.stage.clone(),
        "--aws-profile".to_string(),
        settings.profile.clone(),
    ]
}

/// `docker pull <image>`
#[must_use]
pub fn image_pull_args(settings: &DashboardSettings) -> Vec<String> {
    vec!["pull".to_string(), settings.image.clone()]
}

/// `docker run` with the published port, read-only credentials mount, and
/// the stack name, region, and profile passed as environment variables.
#[must_use]
pub fn container_run_args(settings: &DashboardSettings, stack: &StackInfo) -> Vec<String> {
    vec![
        "run".to_string(),
        "--rm".to_string(),
        "-p".to_string(),
        format!("{}:{}:{CONTAINER_PORT}", settings.host, settings.port),
        "-v".to_string(),
        format!(
            "{}:{CONTAINER_CREDENTIALS_DIR}:ro",
            settings.credentials_dir.display()
        ),
        "--env".to_string(),
        format!("STACKNAME={}", stack.stack),
        "--env".to_string(),
        format!("REGION={}", stack.region),
        "--env".to_string(),
        format!("AWS_PROFILE={}", settings.profile),
        settings.image.clone(),
    ]
}
