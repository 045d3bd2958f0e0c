//! Backend strategies for turning an assembled prompt into response text.
//!
//! Supports the Claude Code CLI, the `llm` CLI, the direct Anthropic API,
//! and a deterministic offline stub. Strategies are interchangeable and
//! share no mutable state; each process run performs exactly one invocation
//! with no retries.

mod api;
mod claude;
mod llm_cli;
mod stub;

pub use api::{ApiBackend, API_KEY_VAR};
pub use claude::ClaudeCodeBackend;
pub use llm_cli::LlmCliBackend;
pub use stub::{StubBackend, COUNTER_PATH_VAR};

use std::fmt;

use async_trait::async_trait;

use crate::error::{Error, Result};

/// Response from a backend invocation.
///
/// On success the text is written to stdout verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The response payload.
    pub text: String,
}

/// Trait for LLM backends.
#[async_trait]
pub trait Backend: Send + Sync + fmt::Debug {
    /// Sends the prompt and returns the textual response.
    async fn invoke(&self, prompt: &str) -> Result<Response>;

    /// Returns the name of this backend.
    fn name(&self) -> &str;
}

/// A named backend choice.
///
/// `Auto` is resolved to a concrete kind before dispatch and never reaches
/// the invocation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// Pick a concrete backend from availability probes.
    Auto,
    /// Claude Code CLI in non-interactive mode.
    ClaudeCode,
    /// The `llm` CLI, prompt fed via stdin.
    Llm,
    /// Direct Anthropic Messages API.
    Api,
    /// Deterministic offline stub with a persistent counter.
    Stub,
}

impl BackendKind {
    /// Returns the kebab-case name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Auto => "auto",
            BackendKind::ClaudeCode => "claude-code",
            BackendKind::Llm => "llm",
            BackendKind::Api => "api",
            BackendKind::Stub => "stub",
        }
    }

    /// Resolves `Auto` to a concrete backend via ordered availability
    /// probes; concrete kinds pass through unchanged.
    ///
    /// Probe order: `claude` CLI on PATH, then `llm` CLI on PATH, then a
    /// non-empty API key in the environment. No probe satisfied is a
    /// configuration error, not a transport error.
    pub fn resolve(self) -> Result<BackendKind> {
        self.resolve_with(
            cli_on_path("claude"),
            cli_on_path("llm"),
            api_key_present(),
        )
    }

    fn resolve_with(self, have_claude: bool, have_llm: bool, have_api_key: bool) -> Result<BackendKind> {
        if self != BackendKind::Auto {
            return Ok(self);
        }
        if have_claude {
            return Ok(BackendKind::ClaudeCode);
        }
        if have_llm {
            return Ok(BackendKind::Llm);
        }
        if have_api_key {
            return Ok(BackendKind::Api);
        }
        Err(Error::Config(format!(
            "no usable backend: install the claude or llm CLI, set {API_KEY_VAR}, or pass --backend"
        )))
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constructs the strategy for a concrete backend kind.
///
/// `kind` must already be resolved; passing `Auto` is a programming error
/// reported as a configuration failure rather than a panic.
pub fn build_backend(kind: BackendKind, model: Option<String>) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match kind {
        BackendKind::Auto => {
            return Err(Error::Config(
                "auto backend must be resolved before dispatch".into(),
            ))
        }
        BackendKind::ClaudeCode => Box::new(ClaudeCodeBackend::new(model)),
        BackendKind::Llm => Box::new(LlmCliBackend::new(model)),
        BackendKind::Api => Box::new(ApiBackend::from_env(model)?),
        BackendKind::Stub => Box::new(StubBackend::from_env()),
    };
    Ok(backend)
}

/// Returns true when an executable with the given name exists on PATH.
fn cli_on_path(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| dir.join(name).is_file())
}

fn api_key_present() -> bool {
    std::env::var(API_KEY_VAR).is_ok_and(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_kinds_resolve_to_themselves() {
        for kind in [
            BackendKind::ClaudeCode,
            BackendKind::Llm,
            BackendKind::Api,
            BackendKind::Stub,
        ] {
            assert_eq!(kind.resolve_with(false, false, false).unwrap(), kind);
        }
    }

    #[test]
    fn auto_prefers_claude_cli() {
        let resolved = BackendKind::Auto.resolve_with(true, true, true).unwrap();
        assert_eq!(resolved, BackendKind::ClaudeCode);
    }

    #[test]
    fn auto_falls_back_to_llm_cli() {
        let resolved = BackendKind::Auto.resolve_with(false, true, true).unwrap();
        assert_eq!(resolved, BackendKind::Llm);
    }

    #[test]
    fn auto_falls_back_to_api_key() {
        let resolved = BackendKind::Auto.resolve_with(false, false, true).unwrap();
        assert_eq!(resolved, BackendKind::Api);
    }

    #[test]
    fn auto_with_nothing_available_is_config_error() {
        let err = BackendKind::Auto
            .resolve_with(false, false, false)
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn build_backend_rejects_auto() {
        let err = build_backend(BackendKind::Auto, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn build_backend_constructs_stub() {
        let backend = build_backend(BackendKind::Stub, None).unwrap();
        assert_eq!(backend.name(), "stub");
    }

    #[test]
    fn kind_names_match_cli_values() {
        assert_eq!(BackendKind::Auto.as_str(), "auto");
        assert_eq!(BackendKind::ClaudeCode.as_str(), "claude-code");
        assert_eq!(BackendKind::Llm.as_str(), "llm");
        assert_eq!(BackendKind::Api.as_str(), "api");
        assert_eq!(BackendKind::Stub.as_str(), "stub");
    }
}
