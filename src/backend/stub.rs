//! Deterministic offline stub backend.
//!
//! Keeps a persistent counter in a single small file so repeated
//! invocations across processes produce an incrementing sequence. Deleting
//! the counter file restarts the sequence at 1. The counter supports
//! sequential reuse only; concurrent invocations are outside the contract.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;

use super::{Backend, Response};

/// Environment variable overriding the counter file location.
pub const COUNTER_PATH_VAR: &str = "LLMPIPE_STUB_COUNTER";

/// File name of the default counter store under the OS temp dir.
const DEFAULT_COUNTER_FILE: &str = "llmpipe-stub-counter";

/// Backend that returns a templated string with an incrementing counter.
///
/// A first-class backend choice, selectable like any real one, so the
/// dispatcher and its callers can be exercised without network access or
/// credentials.
#[derive(Debug)]
pub struct StubBackend {
    counter_path: PathBuf,
}

impl StubBackend {
    /// Creates a stub with an explicit counter file path.
    pub fn new(counter_path: impl Into<PathBuf>) -> Self {
        Self {
            counter_path: counter_path.into(),
        }
    }

    /// Creates a stub from `LLMPIPE_STUB_COUNTER`, falling back to a fixed
    /// path under the OS temp dir.
    pub fn from_env() -> Self {
        let path = std::env::var_os(COUNTER_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_COUNTER_FILE));
        Self::new(path)
    }

    /// Increments the persistent counter and returns the new value.
    ///
    /// A missing file starts the sequence at 1; unparseable contents reset
    /// it rather than wedging the tool.
    fn next_count(&self) -> Result<u64> {
        let current = match std::fs::read_to_string(&self.counter_path) {
            Ok(contents) => contents.trim().parse::<u64>().unwrap_or(0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
            Err(e) => return Err(e.into()),
        };

        let next = current + 1;
        std::fs::write(&self.counter_path, next.to_string())?;
        Ok(next)
    }
}

#[async_trait]
impl Backend for StubBackend {
    async fn invoke(&self, _prompt: &str) -> Result<Response> {
        let count = self.next_count()?;
        tracing::debug!(count, counter = %self.counter_path.display(), "stub backend invoked");
        Ok(Response {
            text: format!("stub response {count}"),
        })
    }

    fn name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stub_in(dir: &TempDir) -> StubBackend {
        StubBackend::new(dir.path().join("counter"))
    }

    #[tokio::test]
    async fn fresh_counter_starts_at_one() {
        let temp_dir = TempDir::new().unwrap();
        let backend = stub_in(&temp_dir);

        let response = backend.invoke("anything").await.unwrap();
        assert_eq!(response.text, "stub response 1");
    }

    #[tokio::test]
    async fn counter_increments_across_invocations() {
        let temp_dir = TempDir::new().unwrap();
        let backend = stub_in(&temp_dir);

        for expected in 1..=5u64 {
            let response = backend.invoke("anything").await.unwrap();
            assert_eq!(response.text, format!("stub response {expected}"));
        }
    }

    #[tokio::test]
    async fn counter_persists_across_backend_instances() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter");

        let first = StubBackend::new(&path).invoke("x").await.unwrap();
        let second = StubBackend::new(&path).invoke("x").await.unwrap();

        assert_eq!(first.text, "stub response 1");
        assert_eq!(second.text, "stub response 2");
    }

    #[tokio::test]
    async fn deleting_counter_restarts_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter");
        let backend = StubBackend::new(&path);

        backend.invoke("x").await.unwrap();
        backend.invoke("x").await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let response = backend.invoke("x").await.unwrap();
        assert_eq!(response.text, "stub response 1");
    }

    #[tokio::test]
    async fn corrupt_counter_resets_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("counter");
        std::fs::write(&path, "not a number").unwrap();

        let response = StubBackend::new(&path).invoke("x").await.unwrap();
        assert_eq!(response.text, "stub response 1");
    }

    #[tokio::test]
    async fn prompt_does_not_affect_output() {
        let temp_dir = TempDir::new().unwrap();
        let backend = stub_in(&temp_dir);

        let first = backend.invoke("one prompt").await.unwrap();
        let second = backend.invoke("a completely different prompt").await.unwrap();

        assert_eq!(first.text, "stub response 1");
        assert_eq!(second.text, "stub response 2");
    }

    #[test]
    fn has_correct_name() {
        let backend = StubBackend::new("/tmp/unused");
        assert_eq!(backend.name(), "stub");
    }
}
