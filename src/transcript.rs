use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{HookError, Result};

/// One record of a session transcript (one line of the JSONL side-file).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    #[serde(default)]
    pub parent_uuid: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub is_sidechain: bool,

    #[serde(default, deserialize_with = "null_as_default")]
    pub user_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub cwd: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub session_id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,

    /// Role discriminator: `user` or `assistant`.
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Raw message body; shape depends on `entry_type`.
    #[serde(default)]
    pub message: Value,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_meta: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_result: Option<Value>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub is_api_error_message: bool,
}

/// Treat an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A user turn. `content` is either a plain string or an array of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMessage {
    pub role: String,
    #[serde(default)]
    pub content: Value,
}

/// An assistant turn as recorded by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub message_type: String,
    pub role: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub stop_sequence: Option<String>,
    #[serde(default)]
    pub usage: Usage,
}

/// Token accounting attached to an assistant message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_tier: Option<String>,
}

/// A content block: `text`, `tool_use`, `tool_result`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl TranscriptEntry {
    pub fn is_user_message(&self) -> bool {
        self.entry_type == "user"
    }

    pub fn is_assistant_message(&self) -> bool {
        self.entry_type == "assistant"
    }

    /// Typed view of the message. `Ok(None)` for non-user entries.
    pub fn user_message(&self) -> Result<Option<UserMessage>> {
        if !self.is_user_message() {
            return Ok(None);
        }
        decode_message(&self.message, "user message").map(Some)
    }

    /// Typed view of the message. `Ok(None)` for non-assistant entries.
    pub fn assistant_message(&self) -> Result<Option<AssistantMessage>> {
        if !self.is_assistant_message() {
            return Ok(None);
        }
        decode_message(&self.message, "assistant message").map(Some)
    }

    /// Concatenated text of the message, whether `content` is a string or a
    /// list of text blocks. Non-text blocks are ignored.
    pub fn text_content(&self) -> String {
        match self.message.get("content") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(blocks)) => blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => String::new(),
        }
    }

    /// Number of `tool_use` blocks in an assistant message.
    pub fn tool_use_count(&self) -> usize {
        match self.message.get("content") {
            Some(Value::Array(blocks)) => blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("tool_use"))
                .count(),
            _ => 0,
        }
    }
}

fn decode_message<T: serde::de::DeserializeOwned>(value: &Value, what: &str) -> Result<T> {
    T::deserialize(value).map_err(|source| HookError::DecodePayload {
        what: what.into(),
        source,
    })
}

/// Read a JSONL transcript file.
///
/// Blank and malformed lines are skipped. Failing to open the file is an
/// error; the dispatcher downgrades it to an empty transcript.
pub fn load_transcript(path: &Path) -> Result<Vec<TranscriptEntry>> {
    let file = fs::File::open(path).map_err(|source| HookError::TranscriptOpen {
        path: path.to_path_buf(),
        source,
    })?;
    read_transcript(BufReader::new(file))
}

/// Parse transcript records from any buffered reader.
///
/// Lines are split on raw bytes, so a line that is not valid UTF-8 is skipped
/// like any other undecodable line.
pub fn read_transcript<R: BufRead>(reader: R) -> Result<Vec<TranscriptEntry>> {
    let mut entries = Vec::new();

    for (line_num, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(HookError::TranscriptRead)?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        match serde_json::from_slice::<TranscriptEntry>(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::debug!("skipping malformed transcript line {}: {}", line_num + 1, e);
            }
        }
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(entry_type: &str, message: Value) -> TranscriptEntry {
        TranscriptEntry {
            entry_type: entry_type.into(),
            message,
            ..Default::default()
        }
    }

    #[test]
    fn text_content_from_string() {
        let e = entry("user", json!({"role": "user", "content": "fix the build"}));
        assert_eq!(e.text_content(), "fix the build");
    }

    #[test]
    fn text_content_from_blocks() {
        let e = entry(
            "assistant",
            json!({
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Running tests."},
                    {"type": "tool_use", "id": "t1", "name": "Bash", "input": {"command": "cargo test"}},
                    {"type": "text", "text": "Done."}
                ]
            }),
        );
        assert_eq!(e.text_content(), "Running tests.\nDone.");
        assert_eq!(e.tool_use_count(), 1);
    }

    #[test]
    fn typed_views_respect_role() {
        let e = entry("user", json!({"role": "user", "content": "hi"}));
        assert!(e.user_message().unwrap().is_some());
        assert!(e.assistant_message().unwrap().is_none());

        let a = entry(
            "assistant",
            json!({"role": "assistant", "model": "m", "content": [], "usage": {"input_tokens": 3}}),
        );
        let msg = a.assistant_message().unwrap().unwrap();
        assert_eq!(msg.usage.input_tokens, 3);
        assert!(a.user_message().unwrap().is_none());
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let data = "{\"type\":\"user\",\"message\":{}}\n\n not json\n{\"type\":\"assistant\"}\n";
        let entries = read_transcript(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_user_message());
        assert!(entries[1].is_assistant_message());
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let mut data = b"{\"type\":\"user\",\"uuid\":\"a\"}\n".to_vec();
        data.extend_from_slice(b"{\"type\":\"user\",\"message\":{\"content\":\"\xff\xfe\"}}\n");
        data.extend_from_slice(b"{\"type\":\"assistant\",\"uuid\":\"b\"}\r\n");
        let entries = read_transcript(&data[..]).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].uuid, "a");
        assert_eq!(entries[1].uuid, "b");
    }

    #[test]
    fn null_fields_keep_the_record() {
        let data = concat!(
            "{\"type\":\"user\",\"uuid\":null,\"cwd\":null,\"message\":{}}\n",
            "{\"type\":\"user\",\"isSidechain\":null,\"sessionId\":null,\"isMeta\":null}\n",
        );
        let entries = read_transcript(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].uuid, "");
        assert_eq!(entries[0].cwd, "");
        assert!(!entries[1].is_sidechain);
        assert!(!entries[1].is_meta);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = load_transcript(Path::new("/nonexistent/transcript.jsonl")).unwrap_err();
        assert!(matches!(err, HookError::TranscriptOpen { .. }));
        assert_eq!(err.kind(), crate::error::ErrorKind::Decode);
        assert!(err.to_string().contains("/nonexistent/transcript.jsonl"));
    }
}
