//! Claude Code CLI backend.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{Error, Result};

use super::{Backend, Response};

/// Backend that shells out to the Claude Code CLI in non-interactive mode.
#[derive(Debug)]
pub struct ClaudeCodeBackend {
    /// Path to the claude CLI binary.
    cli_path: String,
    /// Model to request, passed through when present.
    model: Option<String>,
}

impl ClaudeCodeBackend {
    /// Creates a backend using the default `claude` command.
    pub fn new(model: Option<String>) -> Self {
        Self {
            cli_path: "claude".to_string(),
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

    /// Builds the command arguments for a single-shot invocation.
    fn build_args(&self, prompt: &str) -> Vec<String> {
        let mut args = vec!["--print".to_string()];

        if let Some(model) = &self.model {
            args.push("--model".to_string());
            args.push(model.clone());
        }

        // The prompt goes via -p, required for --print mode
        args.push("-p".to_string());
        args.push(prompt.to_string());

        args
    }
}

#[async_trait]
impl Backend for ClaudeCodeBackend {
    async fn invoke(&self, prompt: &str) -> Result<Response> {
        let args = self.build_args(prompt);

        tracing::debug!(cli = %self.cli_path, "invoking Claude Code CLI");

        let output = Command::new(&self.cli_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Transport(format!("failed to run {}: {}", self.cli_path, e)))?;

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
        "claude-code"
    }
}
