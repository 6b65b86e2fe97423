use std::path::Path;

use crate::error::Error;
use crate::repo::Repo;

/// is `path` left out of snapshots and checkouts
///
/// the storage root is always excluded. entries below the working root go
/// through the repository's ignore filter with their path relative to the
/// working root; anything outside it is kept.
pub fn is_excluded(repo: &Repo, path: &Path) -> bool {
    if path == repo.path() {
        return true;
    }
    match path.strip_prefix(repo.worktree()) {
        Ok(rel) if !rel.as_os_str().is_empty() => repo.is_ignored(rel),
        _ => false,
    }
}

/// convert a walkdir error, keeping the failing path
pub fn walk_error(err: walkdir::Error) -> Error {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    Error::Io { path, source }
}
