//! Call a runner's handlers in-process, without stdin or process exit.

use anyhow::{anyhow, bail, Context};
use serde::Serialize;

use crate::context::HookContext;
use crate::event::{NotificationEvent, PostToolUseEvent, PreToolUseEvent, StopEvent};
use crate::response::{
    BlockDecision, NotificationResponse, PostToolUseResponse, PreToolUseResponse, StopResponse,
    ToolDecision,
};
use crate::runner::Runner;
use crate::transcript::TranscriptEntry;

/// Session id stamped on every event the tester builds.
pub const TEST_SESSION_ID: &str = "test-session";

pub struct HookTester<'a> {
    runner: &'a Runner,
    ctx: HookContext,
}

impl<'a> HookTester<'a> {
    pub fn new(runner: &'a Runner) -> Self {
        Self {
            runner,
            ctx: HookContext::default(),
        }
    }

    pub fn with_context(mut self, ctx: HookContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn pre_tool_use<I: Serialize>(
        &self,
        tool_name: &str,
        tool_input: &I,
    ) -> anyhow::Result<PreToolUseResponse> {
        let event = PreToolUseEvent {
            session_id: TEST_SESSION_ID.into(),
            tool_name: tool_name.into(),
            tool_input: serde_json::to_value(tool_input).context("encoding tool input")?,
            ..Default::default()
        };
        let handler = self
            .runner
            .pre_tool_use_handler()
            .ok_or_else(|| anyhow!("PreToolUse handler not set"))?;
        handler(&self.ctx, &event)
    }

    pub fn post_tool_use<I: Serialize, O: Serialize>(
        &self,
        tool_name: &str,
        tool_input: &I,
        tool_response: &O,
    ) -> anyhow::Result<PostToolUseResponse> {
        let event = PostToolUseEvent {
            session_id: TEST_SESSION_ID.into(),
            tool_name: tool_name.into(),
            tool_input: serde_json::to_value(tool_input).context("encoding tool input")?,
            tool_response: serde_json::to_value(tool_response)
                .context("encoding tool response")?,
            ..Default::default()
        };
        let handler = self
            .runner
            .post_tool_use_handler()
            .ok_or_else(|| anyhow!("PostToolUse handler not set"))?;
        handler(&self.ctx, &event)
    }

    pub fn notification(&self, message: &str) -> anyhow::Result<NotificationResponse> {
        let event = NotificationEvent {
            session_id: TEST_SESSION_ID.into(),
            message: message.into(),
            ..Default::default()
        };
        let handler = self
            .runner
            .notification_handler()
            .ok_or_else(|| anyhow!("Notification handler not set"))?;
        handler(&self.ctx, &event)
    }

    /// Runs whichever stop handler the runner would pick for `stop_hook_active`.
    pub fn stop(
        &self,
        stop_hook_active: bool,
        transcript: Vec<TranscriptEntry>,
    ) -> anyhow::Result<StopResponse> {
        let event = StopEvent {
            session_id: TEST_SESSION_ID.into(),
            stop_hook_active,
            transcript,
            ..Default::default()
        };
        let handler = self
            .runner
            .stop_handler(stop_hook_active)
            .ok_or_else(|| anyhow!("Stop handler not set"))?;
        handler(&self.ctx, &event)
    }

    pub fn assert_approves<I: Serialize>(&self, tool_name: &str, input: &I) -> anyhow::Result<()> {
        let resp = self.pre_tool_use(tool_name, input)?;
        if resp.decision != Some(ToolDecision::Approve) {
            bail!("expected approve, got {:?}", resp.decision);
        }
        Ok(())
    }

    pub fn assert_blocks<I: Serialize>(&self, tool_name: &str, input: &I) -> anyhow::Result<()> {
        let resp = self.pre_tool_use(tool_name, input)?;
        if resp.decision != Some(ToolDecision::Block) {
            bail!("expected block, got {:?}", resp.decision);
        }
        Ok(())
    }

    pub fn assert_blocks_with_reason<I: Serialize>(
        &self,
        tool_name: &str,
        input: &I,
        expected_reason: &str,
    ) -> anyhow::Result<()> {
        let resp = self.pre_tool_use(tool_name, input)?;
        if resp.decision != Some(ToolDecision::Block) {
            bail!("expected block, got {:?}", resp.decision);
        }
        if resp.reason.as_deref() != Some(expected_reason) {
            bail!("expected reason {:?}, got {:?}", expected_reason, resp.reason);
        }
        Ok(())
    }

    pub fn assert_stops_claude<I: Serialize>(
        &self,
        tool_name: &str,
        input: &I,
    ) -> anyhow::Result<()> {
        let resp = self.pre_tool_use(tool_name, input)?;
        if resp.continue_ != Some(false) {
            bail!("expected continue=false, got {:?}", resp.continue_);
        }
        Ok(())
    }

    pub fn assert_post_allows<I: Serialize, O: Serialize>(
        &self,
        tool_name: &str,
        input: &I,
        response: &O,
    ) -> anyhow::Result<()> {
        let resp = self.post_tool_use(tool_name, input, response)?;
        if let Some(decision) = resp.decision {
            bail!("expected allow (no decision), got {:?}", decision);
        }
        Ok(())
    }

    pub fn assert_post_blocks<I: Serialize, O: Serialize>(
        &self,
        tool_name: &str,
        input: &I,
        response: &O,
    ) -> anyhow::Result<()> {
        let resp = self.post_tool_use(tool_name, input, response)?;
        if resp.decision != Some(BlockDecision::Block) {
            bail!("expected block, got {:?}", resp.decision);
        }
        Ok(())
    }

    pub fn assert_notification_ok(&self, message: &str) -> anyhow::Result<()> {
        let resp = self.notification(message)?;
        if resp != NotificationResponse::default() {
            bail!(
                "expected empty response, got continue={:?} stopReason={:?}",
                resp.continue_,
                resp.stop_reason
            );
        }
        Ok(())
    }

    pub fn assert_stop_allows(
        &self,
        stop_hook_active: bool,
        transcript: Vec<TranscriptEntry>,
    ) -> anyhow::Result<()> {
        let resp = self.stop(stop_hook_active, transcript)?;
        if let Some(decision) = resp.decision {
            bail!("expected stop to proceed, got {:?}", decision);
        }
        Ok(())
    }

    pub fn assert_stop_blocks(
        &self,
        stop_hook_active: bool,
        transcript: Vec<TranscriptEntry>,
    ) -> anyhow::Result<()> {
        let resp = self.stop(stop_hook_active, transcript)?;
        if resp.decision != Some(BlockDecision::Block) {
            bail!("expected block, got {:?}", resp.decision);
        }
        Ok(())
    }
}
