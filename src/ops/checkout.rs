use crate::error::Result;
use crate::object::read_commit;
use crate::oid::Oid;
use crate::ops::read_tree::replace_worktree;
use crate::refs::{write_ref, HEAD};
use crate::repo::Repo;

/// restore the working directory to commit `oid` and move HEAD to it
///
/// destructive: tracked and untracked files not in the target snapshot are
/// removed and local edits are discarded. only the storage root and
/// ignored entries survive. files are written before HEAD moves, so an
/// interrupted checkout can leave HEAD on the previous commit with a
/// partially written working directory.
pub fn checkout(repo: &Repo, oid: &Oid) -> Result<()> {
    let _lock = repo.lock()?;

    let commit = read_commit(repo, oid)?;
    replace_worktree(repo, &commit.tree)?;
    write_ref(repo, HEAD, oid)?;

    tracing::info!(commit = %oid, tree = %commit.tree, "checked out commit");
    Ok(())
}
