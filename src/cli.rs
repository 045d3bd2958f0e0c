//! Command-line interface definition.

use std::path::PathBuf;

use clap::Parser;

use crate::backend::BackendKind;

/// Send a prompt through an LLM backend and print the response.
///
/// Piped stdin becomes the input layer, the positional argument becomes the
/// task layer, and `--system`/`--system-file` prime the model. The response
/// goes to stdout; everything else goes to stderr.
#[derive(Parser, Debug)]
#[command(name = "llmpipe", version, about = "Pipe a prompt to an LLM backend")]
pub struct Cli {
    /// Task instruction, appended after any piped input
    pub task: Option<String>,

    /// Backend to use
    #[arg(short, long, value_enum, env = "LLMPIPE_BACKEND")]
    pub backend: Option<BackendKind>,

    /// Model identifier passed through to the backend
    #[arg(short, long)]
    pub model: Option<String>,

    /// Inline system prompt
    #[arg(short = 's', long, conflicts_with = "system_file")]
    pub system: Option<String>,

    /// Read the system prompt from a file
    #[arg(long, value_name = "PATH")]
    pub system_file: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("llmpipe").chain(args.iter().copied()))
    }

    #[test]
    fn bare_invocation_parses() {
        let cli = parse(&[]).unwrap();
        assert!(cli.task.is_none());
        assert!(cli.backend.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn task_is_positional() {
        let cli = parse(&["summarize this"]).unwrap();
        assert_eq!(cli.task.as_deref(), Some("summarize this"));
    }

    #[test]
    fn backend_flag_accepts_all_kinds() {
        for (value, kind) in [
            ("auto", BackendKind::Auto),
            ("claude-code", BackendKind::ClaudeCode),
            ("llm", BackendKind::Llm),
            ("api", BackendKind::Api),
            ("stub", BackendKind::Stub),
        ] {
            let cli = parse(&["-b", value, "task"]).unwrap();
            assert_eq!(cli.backend, Some(kind));
        }
    }

    #[test]
    fn unknown_backend_value_is_rejected() {
        let err = parse(&["-b", "telepathy", "task"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn system_and_system_file_conflict() {
        let err = parse(&["-s", "inline", "--system-file", "f.txt", "task"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn help_is_a_zero_exit_parse_outcome() {
        let err = parse(&["--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn version_is_a_zero_exit_parse_outcome() {
        let err = parse(&["--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }
}
