use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::context::HookContext;
use crate::directive::{ExitDirective, EXIT_BLOCKING_ERROR, EXIT_SUCCESS};
use crate::error::{HookError, Result};
use crate::event::EventKind;

use super::ErrorHandler;

/// Run `f`, turning a panic into a `panic: <value>` handler error.
pub fn catch_panics<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(HookError::panic(panic_message(payload.as_ref()))),
    }
}

/// Stringify a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(e) = payload.downcast_ref::<anyhow::Error>() {
        format!("{e:#}")
    } else if let Some(e) = payload.downcast_ref::<HookError>() {
        e.to_string()
    } else if let Some(e) = payload.downcast_ref::<Box<dyn std::error::Error + Send + Sync>>() {
        e.to_string()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Turn any pipeline error into the directive that ends the process.
///
/// The error callback, when set, sees every error with the raw input
/// and may return a directive that replaces the default policy.
pub fn resolve(
    error_handler: Option<&ErrorHandler>,
    ctx: &HookContext,
    raw: &[u8],
    err: &HookError,
) -> ExitDirective {
    tracing::debug!(kind = ?err.kind(), panicked = err.is_panic(), "hook failed: {}", err);

    if let Some(handler) = error_handler {
        let raw_text = String::from_utf8_lossy(raw);
        match panic::catch_unwind(AssertUnwindSafe(|| handler(ctx, &*raw_text, err))) {
            Ok(Some(directive)) => return directive,
            Ok(None) => {}
            Err(payload) => {
                tracing::warn!(
                    "error handler panicked, using default policy: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    default_directive(raw, err)
}

/// Message on stderr; exit 2, except 0 for Stop so a broken hook never keeps
/// the host from stopping.
pub fn default_directive(raw: &[u8], err: &HookError) -> ExitDirective {
    let code = match EventKind::sniff(raw) {
        Some(EventKind::Stop) => EXIT_SUCCESS,
        _ => EXIT_BLOCKING_ERROR,
    };
    ExitDirective {
        code,
        stdout: String::new(),
        stderr: format!("{err}\n"),
    }
}

/// Route panic reports through tracing instead of the default stderr banner.
pub fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::debug!("hook panicked: {}", info);
    }));
}
