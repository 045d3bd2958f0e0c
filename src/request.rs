//! Request construction and prompt assembly.
//!
//! A request carries up to three optional text layers. Assembly concatenates
//! the layers that are present in a fixed order: system prompt, piped input,
//! task. Callers rely on system-prompt-first ordering for identity and rule
//! priming, so the order is an invariant, not a preference.

use std::path::Path;

use crate::error::{Error, Result};

/// Separator between prompt layers.
const LAYER_SEPARATOR: &str = "\n\n";

/// The input layers of a single invocation.
///
/// Built once from flags, environment, and stdin at process start;
/// immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// Identity/rule priming, always first when present.
    pub system_prompt: Option<String>,
    /// Content piped in on stdin, forwarded into its layer verbatim.
    pub piped_input: Option<String>,
    /// The positional task argument.
    pub task: Option<String>,
}

/// The final prompt text sent to a backend.
///
/// Derived from a [`Request`] exactly once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledPrompt(String);

impl AssembledPrompt {
    /// Returns the assembled text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Request {
    /// Creates a request from its three layers.
    pub fn new(
        system_prompt: Option<String>,
        piped_input: Option<String>,
        task: Option<String>,
    ) -> Self {
        Self {
            system_prompt,
            piped_input,
            task,
        }
    }

    /// Reads a system prompt from a file.
    ///
    /// A missing or unreadable file is a configuration error, distinct from
    /// the missing-task condition.
    pub fn read_system_file(path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "cannot read system prompt file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Assembles the final prompt from the layers that are present.
    ///
    /// Empty layers are omitted entirely, so no stray separators appear.
    /// Fails with [`Error::Input`] when neither piped input nor a task is
    /// present.
    pub fn assemble(&self) -> Result<AssembledPrompt> {
        if !has_content(&self.piped_input) && !has_content(&self.task) {
            return Err(Error::Input);
        }

        let layers: Vec<&str> = [&self.system_prompt, &self.piped_input, &self.task]
            .into_iter()
            .filter_map(|layer| layer.as_deref())
            .filter(|layer| !layer.is_empty())
            .collect();

        Ok(AssembledPrompt(layers.join(LAYER_SEPARATOR)))
    }
}

fn has_content(layer: &Option<String>) -> bool {
    layer.as_deref().is_some_and(|s| !s.is_empty())
}
