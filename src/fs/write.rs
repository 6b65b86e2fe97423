use std::fs::{self, File};
use std::path::{Component, Path};

use walkdir::WalkDir;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::walk::{is_excluded, walk_error};
use crate::repo::Repo;

/// write `content` to `rel` below `root`, creating directories as needed
///
/// each component is checked with `symlink_metadata` before use. a
/// symlink or file where a directory is needed is replaced by a directory,
/// and a symlink or directory at the file itself is removed, so the write
/// never follows a link out of `root`.
pub fn write_file(root: &Path, rel: &Path, content: &[u8]) -> Result<()> {
    if rel.as_os_str().is_empty() {
        return Err(Error::InvalidEntryName("empty path".to_string()));
    }

    let mut path = root.to_path_buf();
    let mut components = rel.components().peekable();

    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            return Err(Error::PathTraversal(rel.display().to_string()));
        };
        path.push(name);

        let meta = match path.symlink_metadata() {
            Ok(meta) => Some(meta),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::Io { path, source: e }),
        };

        if components.peek().is_some() {
            match meta {
                Some(meta) if meta.is_dir() => {}
                Some(_) => {
                    fs::remove_file(&path).with_path(&path)?;
                    fs::create_dir(&path).with_path(&path)?;
                }
                None => fs::create_dir(&path).with_path(&path)?,
            }
        } else {
            match meta {
                Some(meta) if meta.is_dir() => fs::remove_dir_all(&path).with_path(&path)?,
                Some(_) => fs::remove_file(&path).with_path(&path)?,
                None => {}
            }
        }
    }

    fs::write(&path, content).with_path(&path)
}

/// remove everything from the working root except excluded entries
///
/// directories that still hold ignored entries are kept.
pub fn clear_worktree(repo: &Repo) -> Result<()> {
    let root = repo.worktree();

    // pre-order, so excluded directories are pruned before being entered
    let entries = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !is_excluded(repo, e.path()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(walk_error)?;

    let mut removed = 0usize;
    for entry in entries.iter().rev() {
        let path = entry.path();
        if entry.file_type().is_dir() {
            let is_empty = fs::read_dir(path).with_path(path)?.next().is_none();
            if is_empty {
                fs::remove_dir(path).with_path(path)?;
                removed += 1;
            }
        } else {
            fs::remove_file(path).with_path(path)?;
            removed += 1;
        }
    }

    tracing::debug!(removed, root = %root.display(), "cleared working directory");
    Ok(())
}

/// fsync a directory
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
