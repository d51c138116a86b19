//! Knowledge saver command.

use std::io::{self, Write};
use std::path::Path;

use skillbox_knowledge::{
    CommandRunner, CommitOutcome, KNOWLEDGE_DIR, KnowledgeEntry, KnowledgeResult, browse_url,
    commit_and_push, discover_root, ensure_knowledge_dir,
};
use tracing::warn;

use crate::config::KnowledgeSettings;

const USAGE: &str = r#"Usage: save-knowledge "Title" "Content""#;

/// What a save run amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    /// Title or content was missing.
    Usage,
    /// The note could not be written; no git step ran.
    WriteFailed,
    /// The note was written and the git sequence ran.
    Saved(CommitOutcome),
}

impl SaveReport {
    /// Whether the run should end with a failing exit status.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::WriteFailed)
    }
}

/// Writes the note under `knowledge/` of the repository containing `cwd`,
/// then pulls, adds, commits and pushes it.
pub fn save(
    runner: &dyn CommandRunner,
    cwd: &Path,
    title: Option<&str>,
    content: Option<&str>,
    settings: &KnowledgeSettings,
    out: &mut dyn Write,
) -> io::Result<SaveReport> {
    let (Some(title), Some(content)) = (title, content) else {
        writeln!(out, "{}", USAGE)?;
        return Ok(SaveReport::Usage);
    };

    let root = discover_root(runner, cwd, &settings.fallback_root());
    let entry = KnowledgeEntry::new(title, content);
    let filename = entry.filename();

    if let Err(e) = write_entry(&entry, &root) {
        writeln!(out, "Error writing file: {}", e)?;
        return Ok(SaveReport::WriteFailed);
    }
    writeln!(out, "✅ File saved: {}/{}", KNOWLEDGE_DIR, filename)?;
    writeln!(out, "🚀 Pushing to GitHub...")?;

    let outcome = commit_and_push(runner, &root, &filename, entry.title());
    match &outcome {
        CommitOutcome::Pushed => {
            writeln!(out, "🎉 Success! Report is on GitHub.")?;
            match browse_url(&settings.repo_url, &settings.branch, &filename) {
                Ok(url) => writeln!(out, "View at: {}", url)?,
                Err(e) => warn!("{}", e),
            }
        }
        CommitOutcome::Failed { step, detail } => {
            writeln!(out, "Git error: {}", detail)?;
            writeln!(out, "{}", step.failure_message())?;
        }
    }
    Ok(SaveReport::Saved(outcome))
}

fn write_entry(entry: &KnowledgeEntry, root: &Path) -> KnowledgeResult<()> {
    let dir = ensure_knowledge_dir(root)?;
    entry.write_to(&dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbox_knowledge::{CommandOutput, CommitStep};
    use std::cell::RefCell;
    use std::path::PathBuf;

    /// Answers `rev-parse` with a fixed root and fails the named subcommand.
    struct FakeGit {
        root: Option<PathBuf>,
        fail: Option<&'static str>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGit {
        fn new(root: Option<&Path>, fail: Option<&'static str>) -> Self {
            Self {
                root: root.map(Path::to_path_buf),
                fail,
                calls: RefCell::default(),
            }
        }
    }

    impl CommandRunner for FakeGit {
        fn git(&self, _dir: &Path, args: &[&str]) -> KnowledgeResult<CommandOutput> {
            self.calls.borrow_mut().push(args[0].to_string());
            if args[0] == "rev-parse" {
                return Ok(match &self.root {
                    Some(root) => CommandOutput::ok(format!("{}\n", root.display())),
                    None => CommandOutput::failed(128, "fatal: not a git repository"),
                });
            }
            if self.fail == Some(args[0]) {
                return Ok(CommandOutput::failed(1, format!("{} rejected", args[0])));
            }
            Ok(CommandOutput::ok(""))
        }
    }

    fn settings(fallback: &Path) -> KnowledgeSettings {
        KnowledgeSettings {
            fallback_root: fallback.display().to_string(),
            ..KnowledgeSettings::default()
        }
    }

    fn saved_files(root: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(root.join("knowledge"))
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn saves_and_pushes() {
        let repo = tempfile::tempdir().unwrap();
        let git = FakeGit::new(Some(repo.path()), None);
        let mut out = Vec::new();

        let report = save(
            &git,
            repo.path(),
            Some("My Report: Q3!!"),
            Some("Body"),
            &settings(Path::new("/unused")),
            &mut out,
        )
        .unwrap();
        assert_eq!(report, SaveReport::Saved(CommitOutcome::Pushed));
        assert!(!report.is_failure());

        let files = saved_files(repo.path());
        assert_eq!(files.len(), 1);
        let filename = files[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.ends_with("_my-report-q3.md"), "{}", filename);

        let body = std::fs::read_to_string(&files[0]).unwrap();
        assert!(body.starts_with("# My Report: Q3!!\nDate: "));
        assert!(body.ends_with("\n\nBody\n"));

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            format!(
                "✅ File saved: knowledge/{f}\n🚀 Pushing to GitHub...\n🎉 Success! Report is on GitHub.\nView at: https://github.com/jomar-dev/openclaw/blob/main/knowledge/{f}\n",
                f = filename
            )
        );
        assert_eq!(
            *git.calls.borrow(),
            ["rev-parse", "pull", "add", "commit", "push"]
        );
    }

    #[test]
    fn failed_pull_stops_sequence() {
        let repo = tempfile::tempdir().unwrap();
        let git = FakeGit::new(Some(repo.path()), Some("pull"));
        let mut out = Vec::new();

        let report = save(
            &git,
            repo.path(),
            Some("T"),
            Some("B"),
            &settings(Path::new("/unused")),
            &mut out,
        )
        .unwrap();

        assert!(matches!(
            report,
            SaveReport::Saved(CommitOutcome::Failed { step: CommitStep::Pull, .. })
        ));
        assert!(!report.is_failure());
        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("Git error: pull rejected\n⚠️ Pull failed, check conflicts.\n"));
        assert_eq!(*git.calls.borrow(), ["rev-parse", "pull"]);
        // The file stays behind.
        assert_eq!(saved_files(repo.path()).len(), 1);
    }

    #[test]
    fn failed_push_is_reported() {
        let repo = tempfile::tempdir().unwrap();
        let git = FakeGit::new(Some(repo.path()), Some("push"));
        let mut out = Vec::new();

        save(
            &git,
            repo.path(),
            Some("T"),
            Some("B"),
            &settings(Path::new("/unused")),
            &mut out,
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.ends_with("❌ Push failed.\n"));
        assert!(!out.contains("View at"));
    }

    #[test]
    fn falls_back_outside_a_repository() {
        let fallback = tempfile::tempdir().unwrap();
        let git = FakeGit::new(None, None);
        let mut out = Vec::new();

        save(
            &git,
            Path::new("."),
            Some("Loose note"),
            Some("B"),
            &settings(fallback.path()),
            &mut out,
        )
        .unwrap();

        assert_eq!(saved_files(fallback.path()).len(), 1);
    }

    #[test]
    fn missing_arguments_print_usage() {
        let git = FakeGit::new(None, None);
        let mut out = Vec::new();

        let report = save(
            &git,
            Path::new("."),
            Some("Only a title"),
            None,
            &KnowledgeSettings::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(report, SaveReport::Usage);
        assert!(!report.is_failure());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Usage: save-knowledge \"Title\" \"Content\"\n"
        );
        assert!(git.calls.borrow().is_empty());
    }

    #[test]
    fn write_failure_skips_git() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the repository root should be.
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let git = FakeGit::new(Some(&blocker), None);
        let mut out = Vec::new();

        let report = save(
            &git,
            dir.path(),
            Some("T"),
            Some("B"),
            &settings(Path::new("/unused")),
            &mut out,
        )
        .unwrap();

        assert_eq!(report, SaveReport::WriteFailed);
        assert!(report.is_failure());
        assert!(String::from_utf8(out).unwrap().starts_with("Error writing file: "));
        assert_eq!(*git.calls.borrow(), ["rev-parse"]);
    }
}
