//! simux — entry point.
//!
//! Connects to one TCP server, then runs two activities side by side until
//! the operator ends input or the server hangs up:
//!
//! - the **prompt loop** on a dedicated OS thread, reading lines at the
//!   `simux> ` prompt and queueing them on the intake channel;
//! - the **bridge** on the tokio runtime, writing queued commands to the
//!   server and appending everything the server sends to the log file.
//!
//! # Usage
//!
//! ```text
//! simux [OPTIONS] <HOST> <PORT>
//!
//! Options:
//!   -c, --config <PATH>        TOML file with a [session] table
//!       --log-file <PATH>      Inbound byte log        [default: output.log]
//!       --history-file <PATH>  Prompt history          [default: simux.history]
//!   -h, --help
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable             | Flag             |
//! |----------------------|------------------|
//! | `SIMUX_CONFIG`       | `--config`       |
//! | `SIMUX_LOG_FILE`     | `--log-file`     |
//! | `SIMUX_HISTORY_FILE` | `--history-file` |
//! | `RUST_LOG`           | diagnostic level (default `warn`, written to stderr) |
//!
//! Precedence is flag/env over config file over built-in defaults.

use std::fmt::Display;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use simux::application::{
    intake_channel, run_prompt_loop, Bridge, BridgeError, BridgeSummary, IntakeSender, PromptError,
    SessionEnd,
};
use simux::domain::SessionConfig;
use simux::exit_code::ExitStatus;
use simux::infrastructure::{
    connect, load_config, open_log_sink, ConfigError, HistoryFile, RustylineSource,
};
use simux_core::{Endpoint, EndpointError};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Interactive line client.
///
/// Sends each line typed at the prompt to the server (newline-terminated) and
/// appends every byte the server sends back to a log file.
#[derive(Debug, Parser)]
#[command(name = "simux", version)]
struct Cli {
    /// Host name or IP address of the server.
    host: String,

    /// TCP port of the server.
    #[arg(value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// TOML config file with a [session] table.
    #[arg(short, long, env = "SIMUX_CONFIG")]
    config: Option<PathBuf>,

    /// File that receives every byte read from the server.
    #[arg(long, env = "SIMUX_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// File that stores the prompt history.
    #[arg(long, env = "SIMUX_HISTORY_FILE")]
    history_file: Option<PathBuf>,
}

impl Cli {
    fn endpoint(&self) -> Result<Endpoint, EndpointError> {
        Endpoint::new(self.host.clone(), self.port)
    }

    /// Builds the session settings: defaults, then the config file, then flags.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the named config file is missing, malformed
    /// or invalid.
    fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SessionConfig::default(),
        };
        if let Some(path) = &self.log_file {
            config.log_path = path.clone();
        }
        if let Some(path) = &self.history_file {
            config.history_path = path.clone();
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout belongs to the prompt.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return usage(&e).into(),
    };

    let endpoint = match cli.endpoint() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            eprintln!("simux: {e}");
            print_usage();
            return ExitStatus::Usage.into();
        }
    };

    let config = match cli.session_config() {
        Ok(config) => config,
        Err(e) => return fail(ExitStatus::Config, &e).into(),
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")
    {
        Ok(runtime) => runtime,
        Err(e) => return fail(ExitStatus::Runtime, &e).into(),
    };

    runtime.block_on(run_session(endpoint, config)).into()
}

/// Connects, starts the prompt thread, and runs the bridge to completion.
async fn run_session(endpoint: Endpoint, config: SessionConfig) -> ExitStatus {
    let stream = match connect(&endpoint).await {
        Ok(stream) => stream,
        Err(e) => return fail(ExitStatus::from(&e), &e),
    };
    println!("Connected to: {endpoint}");

    // The log is opened only after the connection exists, so a failed
    // connect leaves no file behind.
    let log = match open_log_sink(&config.log_path)
        .await
        .with_context(|| format!("open log {}", config.log_path.display()))
    {
        Ok(log) => log,
        Err(e) => return fail(ExitStatus::LogSink, &e),
    };

    let (intake_tx, intake_rx) = intake_channel();
    let prompt_done = match spawn_prompt(&config, intake_tx) {
        Ok(done) => done,
        Err(e) => return fail(ExitStatus::Prompt, &e),
    };

    let mut bridge = Bridge::new(stream, log, intake_rx, config.read_buffer_size);
    let outcome = bridge.run().await;
    finish_session(outcome, prompt_done, &endpoint, std::io::stdin().is_terminal()).await
}

/// Turns the bridge outcome into an exit status.
///
/// When the bridge stops first and the prompt is on a terminal, the line
/// editor is still inside `readline` with the terminal in raw mode.  The
/// process then waits for the prompt thread to return, which restores the
/// terminal; the operator's next Enter or Ctrl-D ends it.
async fn finish_session(
    outcome: Result<BridgeSummary, BridgeError>,
    prompt_done: oneshot::Receiver<Result<u64, PromptError>>,
    endpoint: &Endpoint,
    prompt_on_terminal: bool,
) -> ExitStatus {
    let status = match outcome {
        Ok(summary) => {
            info!(
                "session ended: {:?}, {} commands sent, {} bytes logged",
                summary.end, summary.commands_forwarded, summary.bytes_logged
            );
            match summary.end {
                SessionEnd::IntakeClosed => {
                    return match prompt_done.await {
                        Ok(Ok(_)) => ExitStatus::Success,
                        Ok(Err(e)) => fail(ExitStatus::Prompt, &e),
                        Err(_) => fail(ExitStatus::Prompt, &"prompt thread stopped unexpectedly"),
                    };
                }
                SessionEnd::RemoteClosed => {
                    eprintln!("simux: connection closed by {endpoint}");
                    ExitStatus::Success
                }
            }
        }
        Err(e) => fail(ExitStatus::Bridge, &e),
    };

    if prompt_on_terminal {
        eprintln!("simux: press Enter or Ctrl-D to exit");
        match prompt_done.await {
            // IntakeClosed is the expected result of Enter once the bridge is gone.
            Ok(Ok(_)) | Ok(Err(PromptError::IntakeClosed)) | Err(_) => {}
            Ok(Err(e)) => warn!("prompt stopped after session end: {e}"),
        }
    }
    status
}

/// Starts the prompt loop on its own OS thread.
///
/// The line editor is created on that thread, so the terminal is only ever
/// touched from there.  The returned receiver yields the loop's result once
/// the operator ends input or the loop fails.
fn spawn_prompt(
    config: &SessionConfig,
    intake: IntakeSender,
) -> anyhow::Result<oneshot::Receiver<Result<u64, PromptError>>> {
    let prompt = config.prompt.clone();
    let mut history = HistoryFile::new(config.history_path.clone());
    let (done_tx, done_rx) = oneshot::channel();

    std::thread::Builder::new()
        .name("simux-prompt".to_string())
        .spawn(move || {
            let entries = history.load().unwrap_or_else(|e| {
                warn!("could not read history {}: {e}", history.path().display());
                Vec::new()
            });
            let result = RustylineSource::new(prompt, &entries)
                .and_then(|mut source| run_prompt_loop(&mut source, &mut history, intake));
            let _ = done_tx.send(result);
        })
        .context("spawn prompt thread")?;

    Ok(done_rx)
}

/// Prints the one-line diagnostic for a fatal error and returns `status`.
fn fail(status: ExitStatus, err: &dyn Display) -> ExitStatus {
    eprintln!("simux: {err:#}");
    status
}

/// Handles a failed argument parse: help, version, or a usage error.
fn usage(err: &clap::Error) -> ExitStatus {
    match err.kind() {
        ErrorKind::DisplayVersion => {
            print!("{err}");
            return ExitStatus::Success;
        }
        ErrorKind::DisplayHelp => {}
        _ => eprintln!("simux: {}", usage_message(err)),
    }
    print_usage();
    ExitStatus::Usage
}

/// The first line of clap's rendered error, without its `error: ` label.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.trim_start_matches("error: ").to_string()
}

fn print_usage() {
    let _ = Cli::command().print_help();
    println!();
}

// ── Tests ─────────────────────────────────────────────────────────────────────
