use std::path::{Path, PathBuf};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use globset::GlobSet;
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::error::{HookError, Result};

/// Policy for the bundled `guard` hook, loaded from `.cchooks/guard.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPolicy {
    /// Substrings that block a Bash command wherever they appear.
    #[serde(default = "default_blocked_commands")]
    pub blocked_commands: Vec<String>,

    /// Regexes that block a Bash command on match.
    #[serde(default)]
    pub blocked_command_patterns: Vec<String>,

    /// Globs for paths that Write/Edit/MultiEdit/NotebookEdit may not touch.
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,

    /// MCP servers whose tools are always blocked.
    #[serde(default)]
    pub blocked_mcp_servers: Vec<String>,
}

fn default_blocked_commands() -> Vec<String> {
    vec![
        "rm -rf /".into(),
        "sudo rm".into(),
        "dd if=".into(),
        "mkfs".into(),
        ":(){ :|:& };:".into(),
        "> /dev/sda".into(),
    ]
}

fn default_protected_paths() -> Vec<String> {
    vec![
        "/etc/**".into(),
        "/usr/**".into(),
        "/bin/**".into(),
        "/sbin/**".into(),
        "/boot/**".into(),
        "**/production/**".into(),
        "**/.env".into(),
        "**/.git/hooks/**".into(),
    ]
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            blocked_commands: default_blocked_commands(),
            blocked_command_patterns: Vec::new(),
            protected_paths: default_protected_paths(),
            blocked_mcp_servers: Vec::new(),
        }
    }
}

impl GuardPolicy {
    /// Load from a YAML file. Returns default if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&contents).map_err(|e| HookError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load from the project root. Checks `.cchooks/guard.yml`.
    pub fn load_project(project_root: &Path) -> Result<Self> {
        Self::load_from(&Self::project_path(project_root))
    }

    pub fn project_path(project_root: &Path) -> PathBuf {
        super::dirs_project(project_root).join("guard.yml")
    }

    pub fn compile(&self) -> Result<CompiledGuard> {
        CompiledGuard::compile(self)
    }
}

/// Guard policy with matchers built and ready to use.
pub struct CompiledGuard {
    commands: AhoCorasick,
    command_literals: Vec<String>,
    command_patterns: RegexSet,
    protected_paths: GlobSet,
    blocked_mcp_servers: Vec<String>,
}

impl std::fmt::Debug for CompiledGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledGuard")
            .field("commands", &self.command_literals)
            .field("command_patterns", &self.command_patterns.patterns())
            .field("protected_paths", &"<GlobSet>")
            .field("blocked_mcp_servers", &self.blocked_mcp_servers)
            .finish()
    }
}

impl CompiledGuard {
    pub fn compile(policy: &GuardPolicy) -> Result<Self> {
        let commands = AhoCorasickBuilder::new()
            .match_kind(MatchKind::LeftmostFirst)
            .build(&policy.blocked_commands)
            .map_err(|e| HookError::InvalidPolicy {
                reason: format!("invalid blocked command list: {e}"),
            })?;
        let command_patterns =
            RegexSet::new(&policy.blocked_command_patterns).map_err(|e| {
                HookError::InvalidPolicy {
                    reason: format!("invalid regex pattern: {e}"),
                }
            })?;
        let protected_paths = build_globset(&policy.protected_paths)?;

        Ok(Self {
            commands,
            command_literals: policy.blocked_commands.clone(),
            command_patterns,
            protected_paths,
            blocked_mcp_servers: policy.blocked_mcp_servers.clone(),
        })
    }

    /// The blocked substring or pattern a command hits, if any.
    pub fn check_command(&self, command: &str) -> Option<String> {
        if let Some(m) = self.commands.find(command) {
            return Some(self.command_literals[m.pattern().as_usize()].clone());
        }
        self.command_patterns
            .matches(command)
            .iter()
            .next()
            .map(|i| self.command_patterns.patterns()[i].clone())
    }

    pub fn is_protected_path(&self, path: &str) -> bool {
        self.protected_paths.is_match(path)
    }

    pub fn is_blocked_mcp_server(&self, server: &str) -> bool {
        self.blocked_mcp_servers.iter().any(|s| s == server)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::Glob::new(pattern).map_err(|e| HookError::GlobPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| HookError::GlobPattern {
        pattern: String::new(),
        reason: e.to_string(),
    })
}
