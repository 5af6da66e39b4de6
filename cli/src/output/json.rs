//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the JSON variant of the renderer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::config::{LambdaphpConfig, VALID_CONFIG_KEYS};

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails (should not happen in
/// practice — `serde_json` only fails on non-finite floats and maps with
/// non-string keys, neither of which appear here).
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders domain types as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(&self, version: &str) -> Result<()> {
        let obj = serde_json::json!({ "version": version });
        println!("{}", serde_json::to_string_pretty(&obj).context("JSON serialization failed")?);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &LambdaphpConfig, path: &Path) -> Result<()> {
        let values: serde_json::Map<String, serde_json::Value> = VALID_CONFIG_KEYS
            .iter()
            .map(|key| ((*key).to_string(), config.get(key).into()))
            .collect();
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "values": values,
        });
        println!("{}", serde_json::to_string_pretty(&obj).context("JSON serialization failed")?);
        Ok(())
    }
}
