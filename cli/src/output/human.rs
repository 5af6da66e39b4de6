//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::domain::config::{
    CONFIG_PATH_ENV, LambdaphpConfig, PROFILE_ENV_VAR, REGION_ENV_VARS, VALID_CONFIG_KEYS,
};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        println!("lambdaphp {version}");
    }

    /// Render the stored configuration and the environment that overrides it.
    pub fn render_config(&self, config: &LambdaphpConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_else(|| "(default)".to_string());
            println!("  {:<20} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        let env_vars = REGION_ENV_VARS
            .iter()
            .copied()
            .chain([PROFILE_ENV_VAR, CONFIG_PATH_ENV]);
        for name in env_vars {
            println!(
                "    {:<20} {}",
                format!("{name}:"),
                std::env::var(name).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}
