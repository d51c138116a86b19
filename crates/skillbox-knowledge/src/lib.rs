//! Saving knowledge notes into a git repository.
//!
//! A note is written as `knowledge/{date}_{slug}.md` under the repository
//! root, then pulled, added, committed and pushed with git. The git steps
//! run through a [`CommandRunner`] so the sequence can be driven by a fake.

pub mod entry;
pub mod error;
pub mod git;
pub mod repo;
pub mod workflow;

pub use entry::KnowledgeEntry;
pub use error::{KnowledgeError, KnowledgeResult};
pub use git::{CommandOutput, CommandRunner, GitRunner};
pub use repo::{KNOWLEDGE_DIR, discover_root, ensure_knowledge_dir, expand_home};
pub use workflow::{
    CommitOutcome, CommitStep, DEFAULT_BRANCH, DEFAULT_FALLBACK_ROOT, DEFAULT_REPO_URL,
    browse_url, commit_and_push,
};
