//! Typed runtime for Claude Code hook binaries.
//!
//! A hook process reads one JSON event from stdin, hands it to the callback
//! registered for its `hook_event_name`, and turns the callback's reply into
//! an exit code plus optional JSON on stdout. [`Runner`] does the plumbing;
//! [`testing::HookTester`] calls the same callbacks in-process.

pub mod cli;
pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod event;
pub mod input;
pub mod logging;
pub mod response;
pub mod runner;
pub mod testing;
pub mod tools;
pub mod transcript;

pub use context::HookContext;
pub use directive::{ExitDirective, EXIT_BLOCKING_ERROR, EXIT_SUCCESS};
pub use error::{ErrorKind, HookError, Result};
pub use event::{
    EventEnvelope, EventKind, HookEvent, NotificationEvent, PostToolUseEvent, PreToolUseEvent,
    StopEvent,
};
pub use response::{
    BlockDecision, NotificationResponse, PostToolUseResponse, PreToolUseResponse, Response,
    StopResponse, ToolDecision,
};
pub use runner::Runner;
pub use testing::HookTester;
pub use tools::ToolCall;
pub use transcript::{load_transcript, TranscriptEntry};
