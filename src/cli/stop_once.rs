use crate::config::RuntimeConfig;
use crate::directive::ExitDirective;
use crate::error::Result;
use crate::response;
use crate::runner::Runner;

pub const DEFAULT_REASON: &str = "Please confirm you want to stop";

/// Block the first stop attempt, let every later one through.
pub async fn run(reason: String, runtime: &RuntimeConfig) -> Result<ExitDirective> {
    Ok(runner(reason).with_config(runtime).run().await)
}

pub fn runner(reason: String) -> Runner {
    Runner::new()
        .on_stop_once(move |_ctx, event| {
            tracing::info!(session = %event.session_id, "first stop attempt, blocking");
            Ok(response::block_stop(reason.clone()))
        })
        .on_stop(|_ctx, event| {
            tracing::debug!(session = %event.session_id, "stop confirmed");
            Ok(response::allow_stop())
        })
}
