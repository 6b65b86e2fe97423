use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::fs::{is_excluded, walk_error};
use crate::object::{hash_file, write_tree};
use crate::oid::Oid;
use crate::repo::Repo;
use crate::types::{EntryKind, Tree, TreeEntry};

/// snapshot the whole working directory, returning the root tree oid
pub fn write_worktree(repo: &Repo) -> Result<Oid> {
    build_tree(repo, repo.worktree())
}

/// store the directory at `dir` as a tree object, returning its oid
///
/// files become blobs and subdirectories become trees. ignored entries
/// and the storage root are skipped; symlinks and special files are
/// skipped with a warning.
///
/// the walk is pre-order with excluded directories pruned before they are
/// entered. entries are then processed in reverse, which puts every child
/// ahead of its parent without recursion.
pub fn build_tree(repo: &Repo, dir: &Path) -> Result<Oid> {
    if !dir.is_dir() {
        return Err(Error::Io {
            path: dir.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }

    let entries = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_excluded(repo, e.path()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(walk_error)?;

    // entries collected so far for each directory not yet written
    let mut pending: HashMap<PathBuf, Vec<TreeEntry>> = HashMap::new();

    for entry in entries.iter().rev() {
        let path = entry.path();
        let file_type = entry.file_type();

        let (kind, oid) = if file_type.is_dir() {
            let children = pending.remove(path).unwrap_or_default();
            let count = children.len();
            let oid = write_tree(repo, &Tree::new(children)?)?;
            tracing::trace!(path = %path.display(), %oid, entries = count, "wrote tree");

            if entry.depth() == 0 {
                tracing::debug!(dir = %dir.display(), %oid, "built tree");
                return Ok(oid);
            }
            (EntryKind::Tree, oid)
        } else if file_type.is_file() {
            (EntryKind::Blob, hash_file(repo, path)?)
        } else {
            tracing::warn!(
                path = %path.display(),
                "skipping entry that is not a regular file or directory"
            );
            continue;
        };

        let name = entry_name(path)?;
        let parent = path.parent().unwrap_or(dir).to_path_buf();
        pending
            .entry(parent)
            .or_default()
            .push(TreeEntry::new(kind, oid, name));
    }

    // the root directory is first in pre-order, so last here
    Err(Error::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::other("directory walk did not yield the root"),
    })
}

fn entry_name(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .ok_or_else(|| Error::InvalidEntryName(path.display().to_string()))?;
    name.to_str()
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidEntryName(format!("not utf-8: {}", path.display())))
}
