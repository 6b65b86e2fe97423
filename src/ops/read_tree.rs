use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::{clear_worktree, write_file};
use crate::object::{load_tree, read_blob};
use crate::oid::Oid;
use crate::repo::Repo;
use crate::types::EntryKind;

/// flatten the tree at `oid` into `path -> blob oid`
///
/// paths are `base` joined with the entry names down to each file. every
/// name is checked before use, so a crafted tree cannot produce a path
/// outside `base`. directories that hold no files don't appear.
pub fn read_tree(repo: &Repo, oid: &Oid, base: &Path) -> Result<BTreeMap<PathBuf, Oid>> {
    let mut files = BTreeMap::new();
    let mut to_visit = vec![(*oid, base.to_path_buf())];

    while let Some((tree_oid, prefix)) = to_visit.pop() {
        // names are validated by the tree parser
        let tree = load_tree(repo, &tree_oid)?;

        for entry in tree.into_entries() {
            let path = prefix.join(&entry.name);
            match entry.kind {
                EntryKind::Blob => {
                    files.insert(path, entry.oid);
                }
                EntryKind::Tree => to_visit.push((entry.oid, path)),
            }
        }
    }

    Ok(files)
}

/// write every blob of a flattened tree below `target`
pub fn materialize(repo: &Repo, files: &BTreeMap<PathBuf, Oid>, target: &Path) -> Result<()> {
    for (path, oid) in files {
        let content = read_blob(repo, oid)?;
        write_file(target, path, &content)?;
    }
    Ok(())
}

/// replace the working directory with the content of a tree
///
/// the tree is fully decoded before anything is removed, so a missing or
/// malformed tree leaves the working directory untouched. HEAD is not
/// changed.
pub fn materialize_tree(repo: &Repo, tree_oid: &Oid) -> Result<()> {
    let _lock = repo.lock()?;
    replace_worktree(repo, tree_oid)
}

/// decode, clear, write; caller holds the lock
pub(crate) fn replace_worktree(repo: &Repo, tree_oid: &Oid) -> Result<()> {
    let files = read_tree(repo, tree_oid, Path::new(""))?;

    clear_worktree(repo)?;
    materialize(repo, &files, repo.worktree())?;

    tracing::debug!(tree = %tree_oid, files = files.len(), "materialized tree");
    Ok(())
}
