//! llmpipe - pipe-friendly prompt dispatch to LLM backends
//!
//! This library assembles a three-layer prompt (system prompt, piped input,
//! task) and dispatches it to one of several interchangeable backends:
//! the Claude Code CLI, the `llm` CLI, the direct Anthropic API, or a
//! deterministic offline stub. The binary wraps it into a single-shot Unix
//! pipeline stage: response on stdout, diagnostics on stderr, exit 0 or 1.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod request;

pub use backend::{
    build_backend, ApiBackend, Backend, BackendKind, ClaudeCodeBackend, LlmCliBackend, Response,
    StubBackend, API_KEY_VAR, COUNTER_PATH_VAR,
};
pub use cli::Cli;
pub use config::{FileConfig, CONFIG_PATH_VAR};
pub use error::Error;
pub use request::{AssembledPrompt, Request};
