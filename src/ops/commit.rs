use crate::error::Result;
use crate::object::write_commit;
use crate::oid::Oid;
use crate::ops::build_tree::write_worktree;
use crate::refs::{head, write_ref, HEAD};
use crate::repo::Repo;
use crate::types::Commit;

/// snapshot the working directory as a new commit on top of HEAD
///
/// the repository lock is held from reading HEAD until HEAD points at
/// the new commit, so concurrent committers cannot drop each other's work.
pub fn commit(repo: &Repo, message: &str) -> Result<Oid> {
    let _lock = repo.lock()?;

    let tree = write_worktree(repo)?;
    let parent = head(repo)?;

    let commit = Commit::new(tree, parent, message);
    let commit_oid = write_commit(repo, &commit)?;

    write_ref(repo, HEAD, &commit_oid)?;

    tracing::info!(commit = %commit_oid, %tree, root = parent.is_none(), "created commit");
    Ok(commit_oid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{load_tree, read_blob, read_commit};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_first_commit_is_root() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("hello.txt"), "hi").unwrap();

        let oid = commit(&repo, "first").unwrap();
        assert_eq!(head(&repo).unwrap(), Some(oid));

        let c = read_commit(&repo, &oid).unwrap();
        assert!(c.is_root());
        assert_eq!(c.message, "first");

        let tree = load_tree(&repo, &c.tree).unwrap();
        let blob = tree.get("hello.txt").unwrap().oid;
        assert_eq!(read_blob(&repo, &blob).unwrap(), b"hi");
    }

    #[test]
    fn test_second_commit_links_parent() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("hello.txt"), "hi").unwrap();
        let c1 = commit(&repo, "first").unwrap();

        fs::write(dir.path().join("hello.txt"), "bye").unwrap();
        let c2 = commit(&repo, "second").unwrap();

        assert_ne!(c1, c2);
        assert_eq!(read_commit(&repo, &c2).unwrap().parent, Some(c1));
        assert_eq!(head(&repo).unwrap(), Some(c2));
    }

    #[test]
    fn test_commit_empty_worktree() {
        let (_dir, repo) = test_repo();

        let oid = commit(&repo, "nothing yet").unwrap();
        let c = read_commit(&repo, &oid).unwrap();
        assert!(load_tree(&repo, &c.tree).unwrap().is_empty());
    }

    #[test]
    fn test_unchanged_tree_still_commits() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("f"), "same").unwrap();

        let c1 = commit(&repo, "one").unwrap();
        let c2 = commit(&repo, "two").unwrap();

        let first = read_commit(&repo, &c1).unwrap();
        let second = read_commit(&repo, &c2).unwrap();
        assert_eq!(first.tree, second.tree);
        assert_eq!(second.parent, Some(c1));
    }

    #[test]
    fn test_multiline_message() {
        let (_dir, repo) = test_repo();

        let oid = commit(&repo, "subject\n\nbody").unwrap();
        assert_eq!(read_commit(&repo, &oid).unwrap().message, "subject\n\nbody");
    }

    #[test]
    fn test_concurrent_commits_keep_history() {
        let (_dir, repo) = test_repo();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let repo = repo.clone();
                std::thread::spawn(move || {
                    for i in 0..5 {
                        commit(&repo, &format!("thread {} commit {}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = crate::ops::log(&repo).unwrap();
        assert_eq!(entries.len(), 20);
    }
}
