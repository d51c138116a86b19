//! Running git.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{KnowledgeError, KnowledgeResult};

/// Captured result of an external command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, when the process exited normally.
    pub code: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Describes a failure: stderr if any, otherwise the exit status.
    pub fn detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs git subcommands in a working directory.
pub trait CommandRunner {
    /// Runs `git {args}` in `dir`.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`]; only a
    /// failure to start the process is an error.
    fn git(&self, dir: &Path, args: &[&str]) -> KnowledgeResult<CommandOutput>;
}

/// [`CommandRunner`] that shells out to the `git` binary.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl GitRunner {
    /// Uses `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Uses a specific git executable.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CommandRunner for GitRunner {
    fn git(&self, dir: &Path, args: &[&str]) -> KnowledgeResult<CommandOutput> {
        debug!(dir = %dir.display(), "running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|source| KnowledgeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_prefers_stderr() {
        let out = CommandOutput::failed(1, "fatal: not a git repository\n");
        assert_eq!(out.detail(), "fatal: not a git repository");
    }

    #[test]
    fn detail_falls_back_to_status() {
        assert_eq!(CommandOutput::failed(128, "  ").detail(), "exit status 128");

        let killed = CommandOutput {
            success: false,
            code: None,
            ..CommandOutput::default()
        };
        assert_eq!(killed.detail(), "terminated by signal");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let runner = GitRunner::with_program("skillbox-no-such-git-binary");

        let err = runner.git(dir.path(), &["status"]).unwrap_err();
        assert!(matches!(err, KnowledgeError::Spawn { ref program, .. } if program == "skillbox-no-such-git-binary"));
    }
}
