//! CLI entry point for the downbot tool.

use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use downbot_core::{
    ChatId, HttpClient, IncomingMessage, JobRunner, JobSettings, JobStatus, MessageId,
};
use tracing::{debug, info};

mod cli;
mod console;

use cli::Args;
use console::ConsoleTransport;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Downbot starting");

    // Read input: from positional args or stdin
    let requests: Vec<String> = if !args.request.is_empty() {
        vec![args.request_text()]
    } else if !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    } else {
        info!("No request provided. Pass one as arguments or pipe requests via stdin.");
        info!("Example: echo 'https://example.com/file.iso 25' | downbot");
        return Ok(ExitCode::SUCCESS);
    };

    if requests.is_empty() {
        info!("No requests found in input");
        return Ok(ExitCode::SUCCESS);
    }

    let workspace_root = args
        .workspace_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("downbot"));

    let client = HttpClient::new_with_timeouts(args.connect_timeout_secs, args.read_timeout_secs);
    let transport = Arc::new(ConsoleTransport::new(&args.output_dir));
    let runner = JobRunner::new(client, transport, JobSettings::new(workspace_root));

    // Requests run one at a time; each line is one chat message.
    let mut completed = 0u32;
    let mut rejected = 0u32;
    let mut failed = 0u32;
    for (index, text) in requests.iter().enumerate() {
        let incoming = IncomingMessage {
            chat: ChatId(0),
            message: MessageId(index as u64),
            text: text.clone(),
        };
        match runner.handle_message(&incoming).await? {
            JobStatus::Completed => completed += 1,
            JobStatus::Rejected => rejected += 1,
            JobStatus::Failed => failed += 1,
        }
    }

    info!(
        completed,
        rejected,
        failed,
        total = requests.len(),
        "Downbot finished"
    );

    let code = if failed > 0 {
        ExitCode::from(1)
    } else if rejected > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };
    Ok(code)
}
