//! Domain types and validators for lambdaphp configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access. Environment
//! variables reach this module as a lookup closure resolved at the command
//! boundary.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "aws.region",
    "aws.profile",
    "dashboard.host",
    "dashboard.port",
    "dashboard.stage",
];

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_DASHBOARD_HOST: &str = "localhost";
pub const DEFAULT_DASHBOARD_PORT: u16 = 8000;
pub const DEFAULT_STAGE: &str = "dev";
pub const DASHBOARD_IMAGE: &str = "bref/dashboard";

/// Environment variables consulted for the region, in order.
pub const REGION_ENV_VARS: &[&str] = &["AWS_DEFAULT_REGION", "AWS_REGION"];
/// Environment variable consulted for the credential profile.
pub const PROFILE_ENV_VAR: &str = "AWS_PROFILE";
/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "LAMBDAPHP_CONFIG";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.lambdaphp/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LambdaphpConfig {
    /// AWS defaults.
    pub aws: AwsConfig,
    /// Dashboard defaults.
    pub dashboard: DashboardConfig,
}

/// AWS defaults used when neither a flag nor an environment variable is set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AwsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Dashboard defaults used when the corresponding flag is omitted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DashboardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl LambdaphpConfig {
    /// Current value of a whitelisted key, `None` when unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "aws.region" => self.aws.region.clone(),
            "aws.profile" => self.aws.profile.clone(),
            "dashboard.host" => self.dashboard.host.clone(),
            "dashboard.port" => self.dashboard.port.map(|p| p.to_string()),
            "dashboard.stage" => self.dashboard.stage.clone(),
            _ => None,
        }
    }

    /// Validate and assign a configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let owned = value.to_string();
        match key {
            "aws.region" => self.aws.region = Some(owned),
            "aws.profile" => self.aws.profile = Some(owned),
            "dashboard.host" => self.dashboard.host = Some(owned),
            "dashboard.port" => self.dashboard.port = Some(parse_port(key, value)?),
            "dashboard.stage" => self.dashboard.stage = Some(owned),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    if key == "dashboard.port" {
        parse_port(key, value)?;
        return Ok(());
    }
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "Value must be non-empty and contain no whitespace.".to_string(),
        }
        .into());
    }
    Ok(())
}

fn parse_port(key: &str, value: &str) -> Result<u16> {
    match value.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "Port must be a number between 1 and 65535.".to_string(),
        }
        .into()),
    }
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// Region and credential profile bound to one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    pub profile: String,
}

impl AwsSettings {
    /// Resolve region and profile: flag, then environment, then config file,
    /// then built-in default. Empty values count as unset.
    pub fn resolve(
        region_flag: Option<&str>,
        profile_flag: Option<&str>,
        config: &AwsConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let region = first_non_empty([
            region_flag.map(str::to_string),
            REGION_ENV_VARS.iter().find_map(|name| non_empty(env(*name))),
            config.region.clone(),
        ])
        .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let profile = resolve_profile(profile_flag, config, &env);

        Self { region, profile }
    }
}

/// Caller-supplied dashboard flags; `None` means "use the default".
#[derive(Debug, Clone, Default)]
pub struct DashboardOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub profile: Option<String>,
    pub stage: Option<String>,
}

/// Fully resolved dashboard parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSettings {
    pub host: String,
    pub port: u16,
    pub profile: String,
    pub stage: String,
    pub image: String,
    /// Host directory holding AWS credentials, mounted read-only.
    pub credentials_dir: PathBuf,
}

impl DashboardSettings {
    /// Resolve dashboard parameters with the same precedence as [`AwsSettings`].
    pub fn resolve(
        overrides: &DashboardOverrides,
        config: &LambdaphpConfig,
        env: impl Fn(&str) -> Option<String>,
        home: &Path,
    ) -> Self {
        let host = first_non_empty([overrides.host.clone(), config.dashboard.host.clone()])
            .unwrap_or_else(|| DEFAULT_DASHBOARD_HOST.to_string());
        let port = overrides
            .port
            .or(config.dashboard.port)
            .unwrap_or(DEFAULT_DASHBOARD_PORT);
        let stage = first_non_empty([overrides.stage.clone(), config.dashboard.stage.clone()])
            .unwrap_or_else(|| DEFAULT_STAGE.to_string());
        let profile = resolve_profile(overrides.profile.as_deref(), &config.aws, &env);

        Self {
            host,
            port,
            profile,
            stage,
            image: DASHBOARD_IMAGE.to_string(),
            credentials_dir: home.join(".aws"),
        }
    }

    /// Local URL the dashboard is served on.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn resolve_profile(
    flag: Option<&str>,
    config: &AwsConfig,
    env: &impl Fn(&str) -> Option<String>,
) -> String {
    first_non_empty([
        flag.map(str::to_string),
        env(PROFILE_ENV_VAR),
        config.profile.clone(),
    ])
    .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn first_non_empty<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates.into_iter().find_map(non_empty)
}

// ── Unit tests ───────────────────────────────────────────────────────────────
