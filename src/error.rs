//! Error types for llmpipe.

use thiserror::Error;

/// Top-level error type for a single invocation.
///
/// Every variant is fatal: it is printed to stderr with the `llmpipe:`
/// prefix and the process exits 1. Nothing is retried.
#[derive(Error, Debug)]
pub enum Error {
    /// No content to process: neither piped input nor a task argument.
    #[error("no input to send: pass a task argument or pipe content on stdin (see --help)")]
    Input,

    /// Unusable configuration: no backend resolved, bad config file,
    /// missing referenced file.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backend process or service could not be reached.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend was reached and reported an application-level error.
    #[error("backend error: {0}")]
    Backend(String),

    /// The backend replied with something that cannot be read as text.
    #[error("unexpected response shape: {0}")]
    ResponseShape(String),

    /// IO error reading stdin, local files, or the stub counter.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for llmpipe operations.
pub type Result<T> = std::result::Result<T, Error>;
