//! The pull → add → commit → push sequence.

use std::fmt;
use std::path::Path;

use tracing::{info, warn};
use url::Url;

use crate::error::{KnowledgeError, KnowledgeResult};
use crate::git::CommandRunner;
use crate::repo::KNOWLEDGE_DIR;

/// Repository notes are browsed at.
pub const DEFAULT_REPO_URL: &str = "https://github.com/jomar-dev/openclaw";

/// Branch notes are browsed on.
pub const DEFAULT_BRANCH: &str = "main";

/// Root used when the working directory is not inside a repository.
pub const DEFAULT_FALLBACK_ROOT: &str = "~/.openclaw/workspace";

/// One git step of the workflow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    /// `git pull` to pick up remote changes first.
    Pull,
    /// `git add` of the new note.
    Add,
    /// `git commit` with the note title in the message.
    Commit,
    /// `git push` to the default remote.
    Push,
}

impl CommitStep {
    /// All steps in the order they run.
    pub const ALL: [CommitStep; 4] = [Self::Pull, Self::Add, Self::Commit, Self::Push];

    /// Arguments passed to git for this step.
    pub fn args(self, filename: &str, title: &str) -> Vec<String> {
        match self {
            Self::Pull => vec!["pull".into()],
            Self::Add => vec!["add".into(), format!("{}/{}", KNOWLEDGE_DIR, filename)],
            Self::Commit => vec![
                "commit".into(),
                "-m".into(),
                format!("feat(knowledge): add {}", title),
            ],
            Self::Push => vec!["push".into()],
        }
    }

    /// Line printed when this step fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Pull => "⚠️ Pull failed, check conflicts.",
            Self::Add => "❌ Add failed.",
            Self::Commit => "❌ Commit failed.",
            Self::Push => "❌ Push failed.",
        }
    }
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pull => "pull",
            Self::Add => "add",
            Self::Commit => "commit",
            Self::Push => "push",
        };
        f.write_str(name)
    }
}

/// How far the sequence got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every step succeeded.
    Pushed,
    /// `step` failed; later steps were not run.
    Failed {
        /// The step that failed.
        step: CommitStep,
        /// Error output of the failed command.
        detail: String,
    },
}

/// Runs pull, add, commit and push in `root`, stopping at the first failure.
///
/// Completed steps are not undone.
pub fn commit_and_push(
    runner: &dyn CommandRunner,
    root: &Path,
    filename: &str,
    title: &str,
) -> CommitOutcome {
    for step in CommitStep::ALL {
        let args = step.args(filename, title);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let detail = match runner.git(root, &args) {
            Ok(out) if out.success => {
                info!("git {} ok", step);
                continue;
            }
            Ok(out) => out.detail(),
            Err(e) => e.to_string(),
        };

        warn!("git {} failed: {}", step, detail);
        return CommitOutcome::Failed { step, detail };
    }
    CommitOutcome::Pushed
}

/// Web URL of a committed note: `{repo}/blob/{branch}/knowledge/{filename}`.
pub fn browse_url(repo_url: &str, branch: &str, filename: &str) -> KnowledgeResult<String> {
    let mut url = Url::parse(repo_url).map_err(|source| KnowledgeError::InvalidRepoUrl {
        url: repo_url.to_string(),
        source,
    })?;

    url.path_segments_mut()
        .map_err(|()| KnowledgeError::InvalidRepoUrl {
            url: repo_url.to_string(),
            source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
        })?
        .pop_if_empty()
        .extend(["blob", branch, KNOWLEDGE_DIR, filename]);

    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommandOutput;
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Answers each git call with the next scripted output, succeeding once
    /// the script runs out.
    #[derive(Default)]
    struct ScriptedRunner {
        script: RefCell<Vec<CommandOutput>>,
        calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
    }

    impl ScriptedRunner {
        fn new(mut script: Vec<CommandOutput>) -> Self {
            script.reverse();
            Self {
                script: RefCell::new(script),
                calls: RefCell::default(),
            }
        }

        fn subcommands(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|(_, a)| a[0].clone()).collect()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn git(&self, dir: &Path, args: &[&str]) -> KnowledgeResult<CommandOutput> {
            self.calls.borrow_mut().push((
                dir.to_path_buf(),
                args.iter().map(|s| s.to_string()).collect(),
            ));
            Ok(self
                .script
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| CommandOutput::ok("")))
        }
    }

    #[test]
    fn all_steps_succeed() {
        let runner = ScriptedRunner::default();
        let outcome = commit_and_push(&runner, Path::new("/repo"), "2024-03-15_t.md", "T");

        assert_eq!(outcome, CommitOutcome::Pushed);
        assert_eq!(runner.subcommands(), ["pull", "add", "commit", "push"]);

        let calls = runner.calls.borrow();
        assert!(calls.iter().all(|(dir, _)| dir == Path::new("/repo")));
        assert_eq!(calls[1].1, ["add", "knowledge/2024-03-15_t.md"]);
        assert_eq!(calls[2].1, ["commit", "-m", "feat(knowledge): add T"]);
    }

    #[test]
    fn failed_pull_stops_everything() {
        let runner = ScriptedRunner::new(vec![CommandOutput::failed(1, "CONFLICT (content)")]);
        let outcome = commit_and_push(&runner, Path::new("/repo"), "f.md", "T");

        assert_eq!(
            outcome,
            CommitOutcome::Failed {
                step: CommitStep::Pull,
                detail: "CONFLICT (content)".into()
            }
        );
        assert_eq!(runner.subcommands(), ["pull"]);
    }

    #[test]
    fn failed_commit_skips_push() {
        let runner = ScriptedRunner::new(vec![
            CommandOutput::ok(""),
            CommandOutput::ok(""),
            CommandOutput::failed(1, ""),
        ]);
        let outcome = commit_and_push(&runner, Path::new("/repo"), "f.md", "T");

        assert!(matches!(
            outcome,
            CommitOutcome::Failed { step: CommitStep::Commit, ref detail } if detail == "exit status 1"
        ));
        assert_eq!(runner.subcommands(), ["pull", "add", "commit"]);
    }

    #[test]
    fn spawn_failure_is_a_step_failure() {
        struct NoGit;
        impl CommandRunner for NoGit {
            fn git(&self, _dir: &Path, _args: &[&str]) -> KnowledgeResult<CommandOutput> {
                Err(KnowledgeError::Spawn {
                    program: "git".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                })
            }
        }

        let outcome = commit_and_push(&NoGit, Path::new("/repo"), "f.md", "T");
        assert_eq!(
            outcome,
            CommitOutcome::Failed {
                step: CommitStep::Pull,
                detail: "failed to run git: not found".into()
            }
        );
    }

    #[test]
    fn failure_messages_are_distinct() {
        let messages: Vec<&str> = CommitStep::ALL.iter().map(|s| s.failure_message()).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(CommitStep::Pull.failure_message().contains("Pull"));
    }

    #[test]
    fn browse_url_layout() {
        assert_eq!(
            browse_url(DEFAULT_REPO_URL, DEFAULT_BRANCH, "2024-03-15_t.md").unwrap(),
            "https://github.com/jomar-dev/openclaw/blob/main/knowledge/2024-03-15_t.md"
        );
        assert_eq!(
            browse_url("https://example.com/notes/", "dev", "a.md").unwrap(),
            "https://example.com/notes/blob/dev/knowledge/a.md"
        );
    }

    #[test]
    fn browse_url_rejects_garbage() {
        let err = browse_url("not a url", "main", "a.md").unwrap_err();
        assert!(matches!(err, KnowledgeError::InvalidRepoUrl { .. }));
    }
}
