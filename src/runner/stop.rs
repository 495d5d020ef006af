use std::path::Path;

use crate::event::StopEvent;
use crate::transcript::load_transcript;

/// Which stop callback runs for a given event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRoute {
    /// `stop_hook_active` is false and a first-attempt handler exists.
    FirstAttempt,
    /// The general stop handler.
    General,
    /// No applicable handler.
    Skip,
}

impl StopRoute {
    /// Resolve the route. The first-attempt handler wins over the general
    /// one whenever the host is not already continuing from a stop hook.
    pub fn resolve(stop_hook_active: bool, has_first_attempt: bool, has_general: bool) -> Self {
        if !stop_hook_active && has_first_attempt {
            StopRoute::FirstAttempt
        } else if has_general {
            StopRoute::General
        } else {
            StopRoute::Skip
        }
    }
}

/// Pick exactly one of the two configured handlers, or none.
pub fn select<'a, H: ?Sized>(
    stop_hook_active: bool,
    first_attempt: Option<&'a H>,
    general: Option<&'a H>,
) -> Option<&'a H> {
    match StopRoute::resolve(stop_hook_active, first_attempt.is_some(), general.is_some()) {
        StopRoute::FirstAttempt => first_attempt,
        StopRoute::General => general,
        StopRoute::Skip => None,
    }
}

/// Fill `event.transcript` from its side-file. Never fails: a missing path or
/// unreadable file leaves an empty transcript.
pub fn attach_transcript(event: &mut StopEvent) {
    event.transcript = match event.transcript_path.as_deref().filter(|p| !p.is_empty()) {
        Some(path) => match load_transcript(Path::new(path)) {
            Ok(entries) => {
                tracing::debug!(path, entries = entries.len(), "loaded transcript");
                entries
            }
            Err(e) => {
                tracing::warn!(path, "transcript unavailable, continuing without it: {}", e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };
}
