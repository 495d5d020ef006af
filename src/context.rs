use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Per-invocation context handed to every callback.
///
/// The dispatcher never consults it; it exists for the handler's own use
/// (timing, locating project files).
#[derive(Debug, Clone)]
pub struct HookContext {
    /// When the hook process started handling the event.
    pub invoked_at: DateTime<Utc>,

    /// Project root reported by the host through `CLAUDE_PROJECT_DIR`.
    pub project_dir: Option<PathBuf>,
}

impl HookContext {
    pub fn new(project_dir: Option<PathBuf>) -> Self {
        Self {
            invoked_at: Utc::now(),
            project_dir,
        }
    }

    /// Build a context from the process environment.
    pub fn from_env() -> Self {
        let project_dir = std::env::var_os("CLAUDE_PROJECT_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::new(project_dir)
    }

    /// Project root, falling back to the current directory.
    pub fn project_root(&self) -> PathBuf {
        self.project_dir.clone().unwrap_or_else(|| {
            std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
        })
    }

    /// Milliseconds since the context was created.
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.invoked_at).num_milliseconds()
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new(None)
    }
}
