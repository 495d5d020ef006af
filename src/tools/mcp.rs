use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HookError, Result};

pub const MCP_PREFIX: &str = "mcp__";

/// A call to a tool served over MCP, named `mcp__<server>__<tool>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpTool {
    /// Server part, e.g. `weather` in `mcp__weather__get_forecast`.
    pub mcp_name: String,
    /// Everything after the server; may itself contain `__`.
    pub tool_name: String,
    pub raw_input: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McpToolOutput {
    pub mcp_name: String,
    pub tool_name: String,
    pub raw_output: Value,
}

/// Split an MCP tool name into `(server, tool)`.
pub fn split_mcp_name(full_name: &str) -> Result<(&str, &str)> {
    let rest = full_name
        .strip_prefix(MCP_PREFIX)
        .ok_or_else(|| HookError::InvalidPayload {
            reason: format!("not an MCP tool: {full_name}"),
        })?;
    match rest.split_once("__") {
        Some((server, tool)) if !server.is_empty() && !tool.is_empty() => Ok((server, tool)),
        _ => Err(HookError::InvalidPayload {
            reason: format!("invalid MCP tool name format: {full_name}"),
        }),
    }
}

impl McpTool {
    pub fn parse(full_name: &str, raw_input: Value) -> Result<Self> {
        let (server, tool) = split_mcp_name(full_name)?;
        Ok(Self {
            mcp_name: server.into(),
            tool_name: tool.into(),
            raw_input,
        })
    }

    /// Decode the raw input as `T`.
    pub fn parse_input<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(&self.raw_input).map_err(|source| HookError::DecodePayload {
            what: format!("mcp__{}__{} input", self.mcp_name, self.tool_name),
            source,
        })
    }
}

impl McpToolOutput {
    pub fn parse(full_name: &str, raw_output: Value) -> Result<Self> {
        let (server, tool) = split_mcp_name(full_name)?;
        Ok(Self {
            mcp_name: server.into(),
            tool_name: tool.into(),
            raw_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_server_and_tool() {
        let tool = McpTool::parse("mcp__weather__get_forecast", json!({"city": "Oslo"})).unwrap();
        assert_eq!(tool.mcp_name, "weather");
        assert_eq!(tool.tool_name, "get_forecast");
        assert_eq!(tool.raw_input["city"], "Oslo");
    }

    #[test]
    fn tool_part_may_contain_separator() {
        let (server, tool) = split_mcp_name("mcp__db__query__raw").unwrap();
        assert_eq!(server, "db");
        assert_eq!(tool, "query__raw");
    }

    #[test]
    fn rejects_non_mcp_and_malformed() {
        let err = split_mcp_name("Bash").unwrap_err();
        assert_eq!(err.to_string(), "not an MCP tool: Bash");

        let err = split_mcp_name("mcp__lonely").unwrap_err();
        assert_eq!(err.to_string(), "invalid MCP tool name format: mcp__lonely");
    }
}
