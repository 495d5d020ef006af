use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cchooks::cli;
use cchooks::config::RuntimeConfig;
use cchooks::logging;

#[derive(Parser)]
#[command(name = "cchooks", version, about = "Ready-made Claude Code hooks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Block dangerous commands, protected paths and denied MCP servers
    Guard {
        /// Policy file (defaults to $CLAUDE_PROJECT_DIR/.cchooks/guard.yml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Block the first stop attempt of a session
    StopOnce {
        /// Reason shown to Claude on the blocked attempt
        #[arg(long, default_value = cli::stop_once::DEFAULT_REASON)]
        reason: String,
    },
    /// Summarise the session transcript when Claude stops
    Transcript,
    /// Log every payload and error without blocking anything
    Debug,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init();
    let args = Cli::parse();
    let runtime = RuntimeConfig::from_env();

    let result = match args.command {
        Commands::Guard { config } => cli::guard::run(config.as_deref(), &runtime).await,
        Commands::StopOnce { reason } => cli::stop_once::run(reason, &runtime).await,
        Commands::Transcript => cli::transcript::run(&runtime).await,
        Commands::Debug => cli::debug::run(&runtime).await,
    };

    // Exit from inside the runtime so a pending stdin read cannot hold up shutdown.
    match result {
        Ok(directive) => directive.exit(),
        Err(e) => {
            eprintln!("cchooks: {e}");
            std::process::exit(1);
        }
    }
}
