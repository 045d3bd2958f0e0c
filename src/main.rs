//! llmpipe CLI entry point.
//!
//! Reads input, assembles the prompt, dispatches to a backend, and writes
//! the response to stdout. Exit code 0 on success, 1 on any failure.
//! stdout carries only the response payload; diagnostics go to stderr.

use std::io::{IsTerminal, Read, Write};

use clap::error::ErrorKind;
use clap::Parser;

use llmpipe::backend::{build_backend, BackendKind};
use llmpipe::cli::Cli;
use llmpipe::config::FileConfig;
use llmpipe::error::Result;
use llmpipe::request::Request;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            // Help and version render on stdout and exit 0, without ever
            // touching a backend.
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{e}");
                std::process::exit(0);
            }
            _ => {
                eprint!("llmpipe: {e}");
                std::process::exit(1);
            }
        },
    };

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("llmpipe: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = FileConfig::load()?;

    let system_prompt = match (&cli.system, &cli.system_file) {
        (Some(text), _) => Some(text.clone()),
        (None, Some(path)) => Some(Request::read_system_file(path)?),
        (None, None) => config.system.clone(),
    };

    let request = Request::new(system_prompt, read_piped_input()?, cli.task);
    let prompt = request.assemble()?;

    // Precedence: --backend / LLMPIPE_BACKEND (via clap), then the config
    // file, then auto resolution.
    let kind = match cli.backend {
        Some(kind) => kind,
        None => config.backend_kind()?.unwrap_or(BackendKind::Auto),
    };
    let resolved = kind.resolve()?;
    let model = cli.model.or(config.model);
    let backend = build_backend(resolved, model)?;

    let request_id = uuid::Uuid::new_v4();
    tracing::debug!(
        request_id = %request_id,
        backend = backend.name(),
        prompt_bytes = prompt.as_str().len(),
        "dispatching request"
    );

    let response = backend.invoke(prompt.as_str()).await?;

    tracing::debug!(request_id = %request_id, response_bytes = response.text.len(), "backend responded");

    write_response(&response.text)?;
    Ok(())
}

/// Reads all of stdin when it is a pipe or file, never when it is a
/// terminal. An empty read counts as no input layer at all.
fn read_piped_input() -> Result<Option<String>> {
    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.read_to_string(&mut buffer)?;

    if buffer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

/// Writes the response verbatim: no framing, no added newline.
fn write_response(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Initializes tracing to stderr; stdout stays reserved for the response.
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
