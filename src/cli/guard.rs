use std::path::Path;
use std::sync::Arc;

use crate::config::{CompiledGuard, GuardPolicy, RuntimeConfig};
use crate::context::HookContext;
use crate::directive::ExitDirective;
use crate::error::Result;
use crate::event::PreToolUseEvent;
use crate::response::{self, PreToolUseResponse};
use crate::runner::Runner;
use crate::tools::ToolCall;

/// Block dangerous commands, protected paths and denied MCP servers.
pub async fn run(config_path: Option<&Path>, runtime: &RuntimeConfig) -> Result<ExitDirective> {
    let policy = match config_path {
        Some(path) => GuardPolicy::load_from(path)?,
        None => GuardPolicy::load_project(&HookContext::from_env().project_root())?,
    };
    let guard = Arc::new(policy.compile()?);
    Ok(runner(guard).with_config(runtime).run().await)
}

pub fn runner(guard: Arc<CompiledGuard>) -> Runner {
    Runner::new()
        .on_pre_tool_use(move |_ctx, event| check(&guard, event))
        .on_post_tool_use(|_ctx, _event| Ok(response::allow()))
}

fn check(guard: &CompiledGuard, event: &PreToolUseEvent) -> anyhow::Result<PreToolUseResponse> {
    if event.tool_name == "Bash" {
        let bash = event.as_bash()?;
        if let Some(hit) = guard.check_command(&bash.command) {
            tracing::info!(command = %bash.command, "blocked command");
            return Ok(response::block(format!(
                "Dangerous command pattern detected: {hit}"
            )));
        }
        return Ok(response::approve());
    }

    if event.is_mcp() {
        let Ok(mcp) = event.as_mcp() else {
            return Ok(response::block(format!(
                "Malformed MCP tool name: {}",
                event.tool_name
            )));
        };
        if guard.is_blocked_mcp_server(&mcp.mcp_name) {
            return Ok(response::block(format!(
                "MCP server '{}' is not allowed",
                mcp.mcp_name
            )));
        }
        return Ok(response::approve());
    }

    if let Some(path) = event.target_path()? {
        if guard.is_protected_path(&path) {
            tracing::info!(%path, tool = %event.tool_name, "blocked write to protected path");
            return Ok(response::block(format!("Cannot modify protected path: {path}")));
        }
    }

    Ok(response::approve())
}
