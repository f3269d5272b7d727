//! Where the session journal lives: the per-user data directory.

use std::path::PathBuf;

use directories::ProjectDirs;

pub fn default_journal_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "Delve").map(|dirs| dirs.data_dir().join("last_session.jsonl"))
}
