//! Host integrations — executable lookup on `PATH` and the default browser.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{BrowserOpener, ToolLocator};

/// Resolves executables with `which`, honouring `PATH` and `PATHEXT`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichLocator;

impl ToolLocator for WhichLocator {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Opens URLs with the platform's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> Result<()> {
        webbrowser::open(url).with_context(|| format!("opening {url}"))
    }
}
