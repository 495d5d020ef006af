use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HookError, Result};
use crate::transcript::TranscriptEntry;

/// Key naming the event kind in every payload.
pub const EVENT_NAME_KEY: &str = "hook_event_name";

/// The closed set of events a hook can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    PreToolUse,
    PostToolUse,
    Notification,
    Stop,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PreToolUse => "PreToolUse",
            EventKind::PostToolUse => "PostToolUse",
            EventKind::Notification => "Notification",
            EventKind::Stop => "Stop",
        }
    }

    /// Best-effort kind lookup on an unparsed payload. `None` when the payload
    /// is not JSON or names no known kind.
    pub fn sniff(raw: &[u8]) -> Option<Self> {
        EventEnvelope::classify(raw).ok().map(|env| env.kind)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventKind {
    type Err = HookError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PreToolUse" => Ok(EventKind::PreToolUse),
            "PostToolUse" => Ok(EventKind::PostToolUse),
            "Notification" => Ok(EventKind::Notification),
            "Stop" => Ok(EventKind::Stop),
            _ => Err(HookError::UnknownEvent { name: s.into() }),
        }
    }
}

/// A classified payload: the kind plus the still-generic JSON object.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub kind: EventKind,
    pub payload: Map<String, Value>,
}

impl EventEnvelope {
    /// Parse `raw` as a JSON object and resolve its event kind.
    pub fn classify(raw: &[u8]) -> Result<Self> {
        let payload: Map<String, Value> =
            serde_json::from_slice(raw).map_err(HookError::DecodeStdin)?;

        let kind: EventKind = payload
            .get(EVENT_NAME_KEY)
            .and_then(Value::as_str)
            .ok_or(HookError::MissingEventName)?
            .parse()?;

        Ok(Self { kind, payload })
    }

    /// Decode the payload into the typed event for this envelope's kind.
    pub fn decode(self) -> Result<HookEvent> {
        let kind = self.kind;
        let value = Value::Object(self.payload);
        Ok(match kind {
            EventKind::PreToolUse => HookEvent::PreToolUse(decode_as(kind, value)?),
            EventKind::PostToolUse => HookEvent::PostToolUse(decode_as(kind, value)?),
            EventKind::Notification => HookEvent::Notification(decode_as(kind, value)?),
            EventKind::Stop => HookEvent::Stop(decode_as(kind, value)?),
        })
    }
}

fn decode_as<T: DeserializeOwned>(kind: EventKind, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| HookError::DecodeEvent {
        kind: kind.as_str(),
        source,
    })
}

/// Sent before a tool runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreToolUseEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
}

/// Sent after a tool ran, with its result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostToolUseEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_input: Value,
    #[serde(default)]
    pub tool_response: Value,
}

/// An advisory notice from the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(default, alias = "notification_message")]
    pub message: String,
}

/// The host wants to stop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StopEvent {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// True when the host is already continuing because of an earlier stop hook.
    #[serde(default)]
    pub stop_hook_active: bool,
    /// Loaded from `transcript_path` by the dispatcher; empty when unavailable.
    #[serde(default, skip_serializing)]
    pub transcript: Vec<TranscriptEntry>,
}

/// A decoded event of one of the four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum HookEvent {
    PreToolUse(PreToolUseEvent),
    PostToolUse(PostToolUseEvent),
    Notification(NotificationEvent),
    Stop(StopEvent),
}

impl HookEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HookEvent::PreToolUse(_) => EventKind::PreToolUse,
            HookEvent::PostToolUse(_) => EventKind::PostToolUse,
            HookEvent::Notification(_) => EventKind::Notification,
            HookEvent::Stop(_) => EventKind::Stop,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            HookEvent::PreToolUse(e) => &e.session_id,
            HookEvent::PostToolUse(e) => &e.session_id,
            HookEvent::Notification(e) => &e.session_id,
            HookEvent::Stop(e) => &e.session_id,
        }
    }
}
