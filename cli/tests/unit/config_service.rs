//! Unit tests for the configuration service and settings resolution.

#![allow(clippy::expect_used)]

use std::path::Path;

use lambdaphp_cli::application::services::config_service;
use lambdaphp_cli::domain::config::AwsConfig;
use lambdaphp_cli::domain::{AwsSettings, DashboardOverrides, DashboardSettings};

use crate::helpers::MemoryConfigStore;

#[test]
fn test_set_value_persists_and_returns_config() {
    let store = MemoryConfigStore::default();

    let config = config_service::set_value(&store, "aws.region", "eu-west-3").expect("set");

    assert_eq!(config.aws.region.as_deref(), Some("eu-west-3"));
    let loaded = config_service::load_config(&store).expect("load");
    assert_eq!(loaded, config);
    assert_eq!(*store.saves.lock().expect("lock"), 1);
}

#[test]
fn test_set_value_parses_port() {
    let store = MemoryConfigStore::default();

    let config = config_service::set_value(&store, "dashboard.port", "8080").expect("set");

    assert_eq!(config.dashboard.port, Some(8080));
}

#[test]
fn test_set_unknown_key_does_not_save() {
    let store = MemoryConfigStore::default();

    assert!(config_service::set_value(&store, "aws.bucket", "x").is_err());
    assert_eq!(*store.saves.lock().expect("lock"), 0);
}

#[test]
fn test_stored_config_feeds_settings_resolution() {
    let store = MemoryConfigStore::default();
    config_service::set_value(&store, "aws.profile", "prod").expect("set");
    config_service::set_value(&store, "dashboard.stage", "staging").expect("set");
    let config = config_service::load_config(&store).expect("load");

    let settings = DashboardSettings::resolve(
        &DashboardOverrides::default(),
        &config,
        |_| None,
        Path::new("/home/dev"),
    );

    assert_eq!(settings.profile, "prod");
    assert_eq!(settings.stage, "staging");
    assert_eq!(settings.url(), "http://localhost:8000");
}

#[test]
fn test_region_env_beats_config_file() {
    let config = AwsConfig {
        region: Some("ap-south-1".to_string()),
        profile: None,
    };

    let settings = AwsSettings::resolve(None, None, &config, |name| {
        (name == "AWS_REGION").then(|| "sa-east-1".to_string())
    });

    assert_eq!(settings.region, "sa-east-1");
    assert_eq!(settings.profile, "default");
}
