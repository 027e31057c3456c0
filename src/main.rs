//! CLI entry point for s1-accounts — a SentinelOne account agents export action.
//!
//! Runs the same pipeline a SOAR platform would host, with the terminal
//! stepping in as the platform: parameters come from CLI flags, log lines go
//! to stdout/stderr, and the attachment is reported as a written file path.
//!
//! Exit codes:
//! - 0: run COMPLETED (including the no-data early exits)
//! - 1: run FAILED (API error, network failure, file I/O error, etc.)
//! - 2: argument validation error (clap handles this automatically)

use std::process::ExitCode;

use clap::Parser;

use s1_accounts::action::{
    run_action, ExecutionState, SoarAction, PARAM_API_KEY, PARAM_BASE_URL, PARAM_OUTPUT_DIR,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the SentinelOne management console
    /// (e.g. "https://your-tenant.sentinelone.net").
    #[arg(long)]
    base_url: String,

    /// SentinelOne API token. Prefer setting via the S1_API_TOKEN
    /// environment variable to avoid exposing the token in process
    /// listings and shell history.
    #[arg(long, env = "S1_API_TOKEN", hide_env_values = true)]
    api_key: String,

    /// Directory for the dated report file. Defaults to /tmp.
    #[arg(long)]
    output_dir: Option<std::path::PathBuf>,
}

/// `SoarAction` implementation over the terminal: info log lines go to
/// stdout, error lines to stderr, and the attachment is summarized rather
/// than dumped (the report is already on disk at the result path).
struct CliPlatform {
    cli: Cli,
}

impl SoarAction for CliPlatform {
    fn parameter(&self, name: &str) -> Option<String> {
        match name {
            PARAM_BASE_URL => Some(self.cli.base_url.clone()),
            PARAM_API_KEY => Some(self.cli.api_key.clone()),
            PARAM_OUTPUT_DIR => self
                .cli
                .output_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().to_string()),
            _ => None,
        }
    }

    fn log_info(&mut self, message: &str) {
        println!("{message}");
    }

    fn log_error(&mut self, message: &str) {
        eprintln!("Error: {message}");
    }

    fn add_attachment(&mut self, filename: &str, _mime_type: &str, content: &str) {
        println!("Attachment {filename}: {} bytes", content.len());
    }

    fn end(&mut self, message: &str, result_value: &str, state: ExecutionState) {
        match state {
            ExecutionState::Completed => {
                println!("{message}");
                if !result_value.is_empty() {
                    println!("Report: {result_value}");
                }
            }
            ExecutionState::Failed => eprintln!("{message}"),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut platform = CliPlatform { cli };

    match run_action(&mut platform).await {
        ExecutionState::Completed => ExitCode::SUCCESS,
        ExecutionState::Failed => ExitCode::FAILURE,
    }
}
