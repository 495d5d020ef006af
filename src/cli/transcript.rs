use crate::config::RuntimeConfig;
use crate::directive::ExitDirective;
use crate::error::Result;
use crate::event::StopEvent;
use crate::response;
use crate::runner::Runner;
use crate::transcript::TranscriptEntry;

/// Counts pulled from a session transcript.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptSummary {
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub tool_uses: usize,
    pub last_user_message: Option<String>,
}

impl TranscriptSummary {
    pub fn from_entries(entries: &[TranscriptEntry]) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            if entry.is_user_message() {
                summary.user_messages += 1;
            } else if entry.is_assistant_message() {
                summary.assistant_messages += 1;
                summary.tool_uses += entry.tool_use_count();
            }
        }
        summary.last_user_message = entries
            .iter()
            .rev()
            .filter(|e| e.is_user_message())
            .map(TranscriptEntry::text_content)
            .find(|text| !text.is_empty());
        summary
    }
}

impl std::fmt::Display for TranscriptSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} user messages, {} assistant messages, {} tool uses",
            self.user_messages, self.assistant_messages, self.tool_uses
        )
    }
}

/// Summarise the transcript when the session stops.
pub async fn run(runtime: &RuntimeConfig) -> Result<ExitDirective> {
    Ok(runner().with_config(runtime).run().await)
}

pub fn runner() -> Runner {
    Runner::new()
        .on_stop_once(|_ctx, event| {
            let summary = log_summary(event);
            Ok(response::block_stop(format!(
                "Transcript analyzed ({summary}). Stop again to confirm."
            )))
        })
        .on_stop(|_ctx, event| {
            log_summary(event);
            Ok(response::allow_stop())
        })
}

fn log_summary(event: &StopEvent) -> TranscriptSummary {
    if event.transcript.is_empty() {
        tracing::info!(session = %event.session_id, "no transcript available");
    }
    let summary = TranscriptSummary::from_entries(&event.transcript);
    tracing::info!(session = %event.session_id, "transcript summary: {}", summary);
    if let Some(last) = &summary.last_user_message {
        tracing::info!("last user message: {}", last);
    }
    summary
}
