//! Locating the repository notes are saved into.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{KnowledgeError, KnowledgeResult};
use crate::git::CommandRunner;

/// Directory under the repository root that holds notes.
pub const KNOWLEDGE_DIR: &str = "knowledge";

/// Expands a leading `~` or `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };
    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Returns the top level of the git repository containing `cwd`, or
/// `fallback` when git cannot tell.
pub fn discover_root(runner: &dyn CommandRunner, cwd: &Path, fallback: &Path) -> PathBuf {
    match runner.git(cwd, &["rev-parse", "--show-toplevel"]) {
        Ok(out) if out.success && !out.stdout.trim().is_empty() => {
            let root = PathBuf::from(out.stdout.trim());
            debug!("repository root is {}", root.display());
            root
        }
        Ok(out) => {
            warn!(
                "not inside a git repository ({}), using {}",
                out.detail(),
                fallback.display()
            );
            fallback.to_path_buf()
        }
        Err(e) => {
            warn!("{}, using {}", e, fallback.display());
            fallback.to_path_buf()
        }
    }
}

/// Creates `{root}/knowledge` if needed and returns it.
pub fn ensure_knowledge_dir(root: &Path) -> KnowledgeResult<PathBuf> {
    let dir = root.join(KNOWLEDGE_DIR);
    fs::create_dir_all(&dir).map_err(|source| KnowledgeError::CreateDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
