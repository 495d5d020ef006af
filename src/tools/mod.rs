//! Typed views over the opaque `tool_input` / `tool_response` payloads.

pub mod input;
pub mod mcp;
pub mod output;

pub use input::*;
pub use mcp::*;
pub use output::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{HookError, Result};
use crate::event::{PostToolUseEvent, PreToolUseEvent};

/// Tools whose input names a file they modify.
pub const WRITE_TOOLS: &[&str] = &["Write", "Edit", "MultiEdit", "NotebookEdit"];

fn decode<T: DeserializeOwned>(value: &Value, what: String) -> Result<T> {
    T::deserialize(value).map_err(|source| HookError::DecodePayload { what, source })
}

/// An event that carries a tool call.
pub trait ToolCall {
    fn tool_name(&self) -> &str;

    fn tool_input(&self) -> &Value;

    /// Decode the tool input as `T`.
    fn parse_input<T: DeserializeOwned>(&self) -> Result<T> {
        decode(self.tool_input(), format!("{} tool input", self.tool_name()))
    }

    fn as_bash(&self) -> Result<BashInput> {
        self.parse_input()
    }

    fn as_edit(&self) -> Result<EditInput> {
        self.parse_input()
    }

    fn as_multi_edit(&self) -> Result<MultiEditInput> {
        self.parse_input()
    }

    fn as_write(&self) -> Result<WriteInput> {
        self.parse_input()
    }

    fn as_read(&self) -> Result<ReadInput> {
        self.parse_input()
    }

    fn as_glob(&self) -> Result<GlobInput> {
        self.parse_input()
    }

    fn as_grep(&self) -> Result<GrepInput> {
        self.parse_input()
    }

    fn as_ls(&self) -> Result<LsInput> {
        self.parse_input()
    }

    fn as_todo_write(&self) -> Result<TodoWriteInput> {
        self.parse_input()
    }

    fn as_todo_read(&self) -> Result<TodoReadInput> {
        self.parse_input()
    }

    fn as_notebook_read(&self) -> Result<NotebookReadInput> {
        self.parse_input()
    }

    fn as_notebook_edit(&self) -> Result<NotebookEditInput> {
        self.parse_input()
    }

    fn as_web_fetch(&self) -> Result<WebFetchInput> {
        self.parse_input()
    }

    fn as_web_search(&self) -> Result<WebSearchInput> {
        self.parse_input()
    }

    fn as_task(&self) -> Result<TaskInput> {
        self.parse_input()
    }

    fn as_exit_plan_mode(&self) -> Result<ExitPlanModeInput> {
        self.parse_input()
    }

    /// Parse `mcp__<server>__<tool>` tool names.
    fn as_mcp(&self) -> Result<McpTool> {
        McpTool::parse(self.tool_name(), self.tool_input().clone())
    }

    fn is_mcp(&self) -> bool {
        self.tool_name().starts_with(MCP_PREFIX)
    }

    /// The file a write-class tool modifies. `Ok(None)` for every other tool.
    fn target_path(&self) -> Result<Option<String>> {
        Ok(match self.tool_name() {
            "Write" => Some(self.as_write()?.file_path),
            "Edit" => Some(self.as_edit()?.file_path),
            "MultiEdit" => Some(self.as_multi_edit()?.file_path),
            "NotebookEdit" => Some(self.as_notebook_edit()?.notebook_path),
            _ => None,
        })
    }
}

impl ToolCall for PreToolUseEvent {
    fn tool_name(&self) -> &str {
        &self.tool_name
    }

    fn tool_input(&self) -> &Value {
        &self.tool_input
    }
}

impl ToolCall for PostToolUseEvent {
    fn tool_name(&self) -> &str {
        &self.tool_name
    }

    fn tool_input(&self) -> &Value {
        &self.tool_input
    }
}

impl PostToolUseEvent {
    /// Decode the tool response as `T`.
    pub fn parse_response<T: DeserializeOwned>(&self) -> Result<T> {
        decode(&self.tool_response, format!("{} tool response", self.tool_name))
    }

    pub fn response_as_bash(&self) -> Result<BashOutput> {
        self.parse_response()
    }

    pub fn response_as_edit(&self) -> Result<EditOutput> {
        self.parse_response()
    }

    pub fn response_as_read(&self) -> Result<ReadOutput> {
        self.parse_response()
    }

    pub fn response_as_glob(&self) -> Result<GlobOutput> {
        self.parse_response()
    }

    pub fn response_as_grep(&self) -> Result<GrepOutput> {
        self.parse_response()
    }

    pub fn response_as_ls(&self) -> Result<LsOutput> {
        self.parse_response()
    }

    pub fn response_as_mcp(&self) -> Result<McpToolOutput> {
        McpToolOutput::parse(&self.tool_name, self.tool_response.clone())
    }
}
