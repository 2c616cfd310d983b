use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    ChatController, ClientSession, ControllerOptions, HttpTransport, TranscriptRenderer,
};
use shared::domain::SessionId;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod terminal;

use config::{load_settings, normalize_server_url, DEFAULT_CONFIG_PATH};
use input::{parse_command, Command, LineBuffer};
use terminal::{DialogPrompt, TerminalRenderer};

type TerminalController = ChatController<HttpTransport, TerminalRenderer, DialogPrompt>;

#[derive(Parser, Debug)]
#[command(about = "Terminal client for an /api/chat conversation backend")]
struct Args {
    /// Optional TOML settings file.
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    /// Abort requests that take longer than this; 0 disables the limit.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Continue an existing backend conversation instead of starting a new one.
    #[arg(long)]
    session_id: Option<String>,
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(&args.config)?;
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if args.timeout_secs.is_some() {
        settings.request_timeout_secs = args.timeout_secs;
    }
    if let Some(v) = args.log_level {
        settings.log_level = v;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let server_url = normalize_server_url(&settings.server_url)?;
    let transport = HttpTransport::with_timeout(server_url.clone(), settings.request_timeout())
        .context("failed to initialize http transport")?;
    let session = match args.session_id {
        Some(id) => ClientSession::new(SessionId::new(id)),
        None => ClientSession::generate(),
    };
    info!(server_url = %server_url, session_id = %session.id(), "chat client starting");

    let renderer = TerminalRenderer::new(&settings);
    renderer.clear_and_show_placeholder();

    let mut controller = ChatController::with_options(
        transport,
        renderer,
        DialogPrompt,
        session,
        ControllerOptions {
            error_hint: settings.error_hint.clone(),
        },
    );

    run(&mut controller).await
}

async fn run(controller: &mut TerminalController) -> Result<()> {
    let mut buffer = LineBuffer::default();

    loop {
        controller.renderer().print_prompt(buffer.is_continuing());
        let message = match read_line().await? {
            Some(line) => match buffer.push_line(&line) {
                Some(message) => message,
                None => continue,
            },
            None => {
                // End of input: send anything still pending, then exit.
                if let Some(message) = buffer.finish() {
                    controller.send(&message).await;
                }
                break;
            }
        };

        match parse_command(&message) {
            Command::Send(text) => {
                controller.send(&text).await;
            }
            Command::Reset => {
                controller.reset().await;
            }
            Command::Help => controller.renderer().print_help(),
            Command::Quit => break,
        }
    }

    info!(session_id = %controller.session().id(), "chat client exiting");
    Ok(())
}

/// Reads one line on the blocking pool; `None` at end of input.
async fn read_line() -> Result<Option<String>> {
    let (read, line) = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|n| (n, line))
    })
    .await
    .context("stdin reader task failed")?
    .context("failed to read from stdin")?;

    Ok((read > 0).then_some(line))
}
