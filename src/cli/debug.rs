use crate::config::RuntimeConfig;
use crate::directive::ExitDirective;
use crate::error::Result;
use crate::response;
use crate::runner::Runner;

/// Log everything the hook receives; never block.
pub async fn run(runtime: &RuntimeConfig) -> Result<ExitDirective> {
    Ok(runner().with_config(runtime).run().await)
}

pub fn runner() -> Runner {
    Runner::new()
        .on_raw(|_ctx, raw| {
            tracing::info!(bytes = raw.len(), "raw payload: {}", raw);
            Ok(None)
        })
        .on_error(|_ctx, raw, err| {
            tracing::error!(kind = ?err.kind(), "error: {}", err);
            tracing::error!("payload that caused it: {}", raw);
            None
        })
        .on_pre_tool_use(|ctx, event| {
            tracing::info!(
                tool = %event.tool_name,
                session = %event.session_id,
                elapsed_ms = ctx.elapsed_ms(),
                "PreToolUse"
            );
            Ok(response::approve())
        })
        .on_post_tool_use(|_ctx, event| {
            tracing::info!(tool = %event.tool_name, session = %event.session_id, "PostToolUse");
            Ok(response::allow())
        })
        .on_notification(|_ctx, event| {
            tracing::info!(session = %event.session_id, message = %event.message, "Notification");
            Ok(response::ok())
        })
        .on_stop(|_ctx, event| {
            tracing::info!(
                session = %event.session_id,
                stop_hook_active = event.stop_hook_active,
                transcript_entries = event.transcript.len(),
                "Stop"
            );
            Ok(response::allow_stop())
        })
}
