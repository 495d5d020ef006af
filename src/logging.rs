use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `CCHOOKS_LOG=cchooks=debug`.
pub const LOG_ENV: &str = "CCHOOKS_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: OnceLock<()> = OnceLock::new();

/// Install a stderr `tracing` subscriber. Stdout carries the hook reply, so
/// logs never go there. Later calls are no-ops.
pub fn init() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    });
}
