pub mod stop;
pub mod supervisor;

use std::time::Duration;

use crate::config::RuntimeConfig;
use crate::context::HookContext;
use crate::directive::{ExitDirective, EXIT_BLOCKING_ERROR};
use crate::error::{HookError, Result};
use crate::event::{
    EventEnvelope, EventKind, HookEvent, NotificationEvent, PostToolUseEvent, PreToolUseEvent,
    StopEvent,
};
use crate::input::{self, DEFAULT_STDIN_TIMEOUT};
use crate::response::{
    NotificationResponse, PostToolUseResponse, PreToolUseResponse, Response, StopResponse,
};

/// Sees the raw payload before parsing. `Some` ends the invocation with that directive.
pub type RawHandler =
    Box<dyn Fn(&HookContext, &str) -> anyhow::Result<Option<ExitDirective>> + Send + Sync>;

/// Callback for one event kind.
pub type Handler<E, R> = Box<dyn Fn(&HookContext, &E) -> anyhow::Result<R> + Send + Sync>;

/// Sees every error with the raw payload. `Some` replaces the default policy.
pub type ErrorHandler =
    Box<dyn Fn(&HookContext, &str, &HookError) -> Option<ExitDirective> + Send + Sync>;

/// Dispatches one hook event to the registered callbacks.
///
/// ```no_run
/// use cchooks::{response, Runner, ToolCall};
///
/// Runner::new()
///     .on_pre_tool_use(|_ctx, event| {
///         if event.tool_name == "Bash" {
///             let bash = event.as_bash()?;
///             if bash.command.contains("rm -rf") {
///                 return Ok(response::block("refusing rm -rf"));
///             }
///         }
///         Ok(response::approve())
///     })
///     .run_blocking()
/// ```
pub struct Runner {
    raw: Option<RawHandler>,
    pre_tool_use: Option<Handler<PreToolUseEvent, PreToolUseResponse>>,
    post_tool_use: Option<Handler<PostToolUseEvent, PostToolUseResponse>>,
    notification: Option<Handler<NotificationEvent, NotificationResponse>>,
    stop: Option<Handler<StopEvent, StopResponse>>,
    stop_once: Option<Handler<StopEvent, StopResponse>>,
    error: Option<ErrorHandler>,
    stdin_timeout: Duration,
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("raw", &self.raw.is_some())
            .field("pre_tool_use", &self.pre_tool_use.is_some())
            .field("post_tool_use", &self.post_tool_use.is_some())
            .field("notification", &self.notification.is_some())
            .field("stop", &self.stop.is_some())
            .field("stop_once", &self.stop_once.is_some())
            .field("error", &self.error.is_some())
            .field("stdin_timeout", &self.stdin_timeout)
            .finish()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            raw: None,
            pre_tool_use: None,
            post_tool_use: None,
            notification: None,
            stop: None,
            stop_once: None,
            error: None,
            stdin_timeout: DEFAULT_STDIN_TIMEOUT,
        }
    }

    pub fn on_raw<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &str) -> anyhow::Result<Option<ExitDirective>> + Send + Sync + 'static,
    {
        self.raw = Some(Box::new(f));
        self
    }

    pub fn on_pre_tool_use<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &PreToolUseEvent) -> anyhow::Result<PreToolUseResponse>
            + Send
            + Sync
            + 'static,
    {
        self.pre_tool_use = Some(Box::new(f));
        self
    }

    pub fn on_post_tool_use<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &PostToolUseEvent) -> anyhow::Result<PostToolUseResponse>
            + Send
            + Sync
            + 'static,
    {
        self.post_tool_use = Some(Box::new(f));
        self
    }

    pub fn on_notification<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &NotificationEvent) -> anyhow::Result<NotificationResponse>
            + Send
            + Sync
            + 'static,
    {
        self.notification = Some(Box::new(f));
        self
    }

    /// General stop handler. Runs when `stop_hook_active` is true, or when no
    /// first-attempt handler is set.
    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &StopEvent) -> anyhow::Result<StopResponse> + Send + Sync + 'static,
    {
        self.stop = Some(Box::new(f));
        self
    }

    /// First-attempt stop handler. Takes precedence over [`Runner::on_stop`]
    /// whenever `stop_hook_active` is false.
    pub fn on_stop_once<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &StopEvent) -> anyhow::Result<StopResponse> + Send + Sync + 'static,
    {
        self.stop_once = Some(Box::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookContext, &str, &HookError) -> Option<ExitDirective> + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    pub fn with_stdin_timeout(mut self, timeout: Duration) -> Self {
        self.stdin_timeout = timeout;
        self
    }

    pub fn with_config(self, config: &RuntimeConfig) -> Self {
        self.with_stdin_timeout(config.stdin_timeout)
    }

    pub(crate) fn pre_tool_use_handler(
        &self,
    ) -> Option<&Handler<PreToolUseEvent, PreToolUseResponse>> {
        self.pre_tool_use.as_ref()
    }

    pub(crate) fn post_tool_use_handler(
        &self,
    ) -> Option<&Handler<PostToolUseEvent, PostToolUseResponse>> {
        self.post_tool_use.as_ref()
    }

    pub(crate) fn notification_handler(
        &self,
    ) -> Option<&Handler<NotificationEvent, NotificationResponse>> {
        self.notification.as_ref()
    }

    /// The stop handler that would run for this `stop_hook_active` value.
    pub(crate) fn stop_handler(
        &self,
        stop_hook_active: bool,
    ) -> Option<&Handler<StopEvent, StopResponse>> {
        stop::select(
            stop_hook_active,
            self.stop_once.as_ref(),
            self.stop.as_ref(),
        )
    }

    /// Read the event from stdin and dispatch it. The caller ends the
    /// process with [`ExitDirective::exit`].
    pub async fn run(&self) -> ExitDirective {
        supervisor::install_panic_hook();
        let ctx = HookContext::from_env();
        match input::read_stdin(self.stdin_timeout).await {
            Ok(raw) => self.dispatch(&ctx, &raw),
            Err(err) => supervisor::resolve(self.error.as_ref(), &ctx, &[], &err),
        }
    }

    /// Run on a fresh current-thread runtime and exit the process.
    pub fn run_blocking(&self) -> ! {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => ExitDirective::new(EXIT_BLOCKING_ERROR, "")
                .with_stderr(format!("failed to start runtime: {e}\n"))
                .exit(),
        };
        // Exit while the runtime is still alive: a timed-out stdin read keeps a
        // blocking thread that would stall runtime shutdown.
        let directive = rt.block_on(self.run());
        directive.exit()
    }

    /// Process one raw payload. Never exits or writes to the standard streams.
    pub fn dispatch(&self, ctx: &HookContext, raw: &[u8]) -> ExitDirective {
        match supervisor::catch_panics(|| self.process(ctx, raw)) {
            Ok(directive) => directive,
            Err(err) => supervisor::resolve(self.error.as_ref(), ctx, raw, &err),
        }
    }

    fn process(&self, ctx: &HookContext, raw: &[u8]) -> Result<ExitDirective> {
        if let Some(raw_handler) = &self.raw {
            let text = String::from_utf8_lossy(raw);
            if let Some(directive) = raw_handler(ctx, &*text).map_err(HookError::handler)? {
                tracing::debug!(code = directive.code, "raw handler short-circuited");
                return Ok(directive);
            }
        }

        let envelope = EventEnvelope::classify(raw)?;
        if !self.handles(envelope.kind) {
            tracing::debug!(kind = %envelope.kind, "no handler registered");
            return Ok(ExitDirective::success());
        }

        let event = envelope.decode()?;
        match self.invoke(ctx, event)? {
            Some(response) => ExitDirective::from_response(&response),
            None => Ok(ExitDirective::success()),
        }
    }

    /// Whether a payload of `kind` needs decoding at all. Stop always does:
    /// which handler runs depends on `stop_hook_active`.
    fn handles(&self, kind: EventKind) -> bool {
        match kind {
            EventKind::PreToolUse => self.pre_tool_use.is_some(),
            EventKind::PostToolUse => self.post_tool_use.is_some(),
            EventKind::Notification => self.notification.is_some(),
            EventKind::Stop => true,
        }
    }

    /// Call the handler registered for `event`. `Ok(None)` when there is none.
    pub fn invoke(&self, ctx: &HookContext, event: HookEvent) -> Result<Option<Response>> {
        tracing::debug!(kind = %event.kind(), session = event.session_id(), "dispatching");
        match event {
            HookEvent::PreToolUse(e) => call(self.pre_tool_use.as_ref(), ctx, &e),
            HookEvent::PostToolUse(e) => call(self.post_tool_use.as_ref(), ctx, &e),
            HookEvent::Notification(e) => call(self.notification.as_ref(), ctx, &e),
            HookEvent::Stop(mut e) => {
                stop::attach_transcript(&mut e);
                call(self.stop_handler(e.stop_hook_active), ctx, &e)
            }
        }
    }
}

fn call<E, R>(
    handler: Option<&Handler<E, R>>,
    ctx: &HookContext,
    event: &E,
) -> Result<Option<Response>>
where
    R: Into<Response>,
{
    let Some(handler) = handler else {
        return Ok(None);
    };
    handler(ctx, event)
        .map(|r| Some(r.into()))
        .map_err(HookError::handler)
}
