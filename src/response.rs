use serde::{Deserialize, Serialize};

/// Decision a PreToolUse hook can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolDecision {
    /// Run the tool without asking the user.
    Approve,
    /// Refuse the tool call; `reason` is shown to the model.
    Block,
}

/// The only decision PostToolUse and Stop hooks can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockDecision {
    Block,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreToolUseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<ToolDecision>,
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_: Option<bool>,
    #[serde(default, rename = "stopReason", skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostToolUseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<BlockDecision>,
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_: Option<bool>,
    #[serde(default, rename = "stopReason", skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationResponse {
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_: Option<bool>,
    #[serde(default, rename = "stopReason", skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<BlockDecision>,
    #[serde(default, rename = "continue", skip_serializing_if = "Option::is_none")]
    pub continue_: Option<bool>,
    #[serde(default, rename = "stopReason", skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// What a handler produced, tagged by event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    PreToolUse(PreToolUseResponse),
    PostToolUse(PostToolUseResponse),
    Notification(NotificationResponse),
    Stop(StopResponse),
}

impl Response {
    /// A response with every field unset means "allow silently".
    pub fn is_empty(&self) -> bool {
        match self {
            Response::PreToolUse(r) => {
                r.decision.is_none()
                    && r.continue_.is_none()
                    && r.stop_reason.is_none()
                    && r.reason.is_none()
            }
            Response::PostToolUse(r) => {
                r.decision.is_none()
                    && r.continue_.is_none()
                    && r.stop_reason.is_none()
                    && r.reason.is_none()
            }
            Response::Notification(r) => r.continue_.is_none() && r.stop_reason.is_none(),
            Response::Stop(r) => {
                r.decision.is_none()
                    && r.continue_.is_none()
                    && r.stop_reason.is_none()
                    && r.reason.is_none()
            }
        }
    }
}

impl From<PreToolUseResponse> for Response {
    fn from(r: PreToolUseResponse) -> Self {
        Response::PreToolUse(r)
    }
}

impl From<PostToolUseResponse> for Response {
    fn from(r: PostToolUseResponse) -> Self {
        Response::PostToolUse(r)
    }
}

impl From<NotificationResponse> for Response {
    fn from(r: NotificationResponse) -> Self {
        Response::Notification(r)
    }
}

impl From<StopResponse> for Response {
    fn from(r: StopResponse) -> Self {
        Response::Stop(r)
    }
}

/// Approve the tool call.
pub fn approve() -> PreToolUseResponse {
    PreToolUseResponse {
        decision: Some(ToolDecision::Approve),
        ..Default::default()
    }
}

/// Block the tool call with a reason for the model.
pub fn block(reason: impl Into<String>) -> PreToolUseResponse {
    PreToolUseResponse {
        decision: Some(ToolDecision::Block),
        reason: Some(reason.into()),
        ..Default::default()
    }
}

/// Halt the session from a PreToolUse hook.
pub fn stop_claude(reason: impl Into<String>) -> PreToolUseResponse {
    PreToolUseResponse {
        continue_: Some(false),
        stop_reason: Some(reason.into()),
        ..Default::default()
    }
}

/// Empty PostToolUse response.
pub fn allow() -> PostToolUseResponse {
    PostToolUseResponse::default()
}

pub fn post_block(reason: impl Into<String>) -> PostToolUseResponse {
    PostToolUseResponse {
        decision: Some(BlockDecision::Block),
        reason: Some(reason.into()),
        ..Default::default()
    }
}

pub fn stop_claude_post(reason: impl Into<String>) -> PostToolUseResponse {
    PostToolUseResponse {
        continue_: Some(false),
        stop_reason: Some(reason.into()),
        ..Default::default()
    }
}

/// Empty Notification response.
pub fn ok() -> NotificationResponse {
    NotificationResponse::default()
}

pub fn stop_from_notification(reason: impl Into<String>) -> NotificationResponse {
    NotificationResponse {
        continue_: Some(false),
        stop_reason: Some(reason.into()),
    }
}

/// Empty Stop response: let the host stop.
pub fn allow_stop() -> StopResponse {
    StopResponse::default()
}

/// Keep the host going; `reason` tells the model what to do next.
pub fn block_stop(reason: impl Into<String>) -> StopResponse {
    StopResponse {
        decision: Some(BlockDecision::Block),
        reason: Some(reason.into()),
        ..Default::default()
    }
}

pub fn stop_from_stop(reason: impl Into<String>) -> StopResponse {
    StopResponse {
        continue_: Some(false),
        stop_reason: Some(reason.into()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn helpers_are_empty_or_not() {
        assert!(Response::from(allow()).is_empty());
        assert!(Response::from(ok()).is_empty());
        assert!(Response::from(allow_stop()).is_empty());
        assert!(Response::from(PreToolUseResponse::default()).is_empty());

        assert!(!Response::from(approve()).is_empty());
        assert!(!Response::from(post_block("x")).is_empty());
        assert!(!Response::from(stop_from_notification("x")).is_empty());
        assert!(!Response::from(block_stop("x")).is_empty());
    }

    #[test]
    fn single_field_makes_response_non_empty() {
        let r = StopResponse {
            continue_: Some(true),
            ..Default::default()
        };
        assert!(!Response::from(r).is_empty());
    }

    #[test]
    fn wire_names() {
        let v = serde_json::to_value(Response::from(stop_claude("halt"))).unwrap();
        assert_eq!(v, json!({"continue": false, "stopReason": "halt"}));

        let v = serde_json::to_value(Response::from(block("no"))).unwrap();
        assert_eq!(v, json!({"decision": "block", "reason": "no"}));
    }
}
