//! `llm` CLI backend.
//!
//! Unlike the Claude CLI, `llm` takes its prompt on stdin, which keeps the
//! argument list short regardless of prompt size.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{Error, Result};

use super::{Backend, Response};

/// Backend that shells out to the `llm` CLI.
#[derive(Debug)]
pub struct LlmCliBackend {
    /// Path to the llm CLI binary.
    cli_path: String,
    /// Model to request, passed through when present.
    model: Option<String>,
}

impl LlmCliBackend {
    /// Creates a backend using the default `llm` command.
    pub fn new(model: Option<String>) -> Self {
        Self {
            cli_path: "llm".to_string(),
            model,
        }
    }

    /// Creates a backend with a custom CLI path.
    pub fn with_cli_path(cli_path: impl Into<String>, model: Option<String>) -> Self {
        Self {
            cli_path: cli_path.into(),
            model,
        }
    }

    fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(model) = &self.model {
            args.push("-m".to_string());
            args.push(model.clone());
        }
        args
    }
}

#[async_trait]
impl Backend for LlmCliBackend {
    async fn invoke(&self, prompt: &str) -> Result<Response> {
        let args = self.build_args();

        tracing::debug!(cli = %self.cli_path, "invoking llm CLI");

        let mut child = Command::new(&self.cli_path)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Transport(format!("failed to run {}: {}", self.cli_path, e)))?;

        {
            let mut stdin = child.stdin.take().expect("stdin was piped");
            // A child that dies before reading stdin reports through its
            // exit status, not the broken pipe.
            if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(Error::Transport(format!(
                        "failed to write prompt to {}: {}",
                        self.cli_path, e
                    )));
                }
            }
            // Dropping the handle closes the pipe so the child sees EOF.
        }

        let output = child.wait_with_output().await.map_err(|e| {
            Error::Transport(format!("failed to wait for {}: {}", self.cli_path, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let cause = stderr.trim();
            let message = if cause.is_empty() {
                format!("{} exited with {}", self.cli_path, output.status)
            } else {
                cause.to_string()
            };
            return Err(Error::Backend(message));
        }

        let text = String::from_utf8(output.stdout).map_err(|_| {
            Error::ResponseShape(format!("{} produced non-UTF-8 output", self.cli_path))
        })?;

        Ok(Response { text })
    }

    fn name(&self) -> &str {
        "llm"
    }
}
