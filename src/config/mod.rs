pub mod guard;

pub use guard::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::input::DEFAULT_STDIN_TIMEOUT;

/// Environment variable overriding the stdin wait budget, in milliseconds.
pub const STDIN_TIMEOUT_ENV: &str = "CCHOOKS_STDIN_TIMEOUT_MS";

/// Settings the runtime reads from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// How long to wait for the first byte on stdin.
    pub stdin_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stdin_timeout: DEFAULT_STDIN_TIMEOUT,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparsable values fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(STDIN_TIMEOUT_ENV) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.stdin_timeout = Duration::from_millis(ms),
                Err(e) => {
                    tracing::warn!("ignoring {}={:?}: {}", STDIN_TIMEOUT_ENV, value, e);
                }
            }
        }
        config
    }
}

/// Returns the project config directory: `<project>/.cchooks/`
pub fn dirs_project(project_root: &Path) -> PathBuf {
    project_root.join(".cchooks")
}
