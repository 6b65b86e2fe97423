use crate::error::{Error, Result};
use crate::oid::Oid;
use crate::refs::{head, tag_ref, write_ref, HEAD};
use crate::repo::Repo;

/// point tag `name` at `oid`, or at the current HEAD when `oid` is `None`
///
/// tags are plain refs under `refs/tags/`; no object is written.
pub fn tag(repo: &Repo, name: &str, oid: Option<Oid>) -> Result<Oid> {
    let _lock = repo.lock()?;

    let target = match oid {
        Some(oid) => oid,
        None => head(repo)?.ok_or_else(|| Error::RefNotFound(HEAD.to_string()))?,
    };
    write_ref(repo, &tag_ref(name), &target)?;

    tracing::info!(tag = name, %target, "tagged");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::commit;
    use crate::refs::{list_tags, read_ref, resolve_ref};
    use std::fs;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_tag_head() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("f"), "x").unwrap();
        let c1 = commit(&repo, "first").unwrap();

        assert_eq!(tag(&repo, "v1", None).unwrap(), c1);
        assert_eq!(read_ref(&repo, "refs/tags/v1").unwrap(), Some(c1));
        assert!(repo.path().join("refs/tags/v1").is_file());
    }

    #[test]
    fn test_tag_explicit_commit() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("f"), "1").unwrap();
        let c1 = commit(&repo, "one").unwrap();
        fs::write(dir.path().join("f"), "2").unwrap();
        commit(&repo, "two").unwrap();

        tag(&repo, "old", Some(c1)).unwrap();
        assert_eq!(resolve_ref(&repo, "old").unwrap(), c1);
        assert_eq!(list_tags(&repo).unwrap(), vec!["old"]);
    }

    #[test]
    fn test_tag_without_commits() {
        let (_dir, repo) = test_repo();

        let result = tag(&repo, "v1", None);
        assert!(matches!(result, Err(Error::RefNotFound(_))));
    }

    #[test]
    fn test_retag_moves_tag() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("f"), "1").unwrap();
        let c1 = commit(&repo, "one").unwrap();
        tag(&repo, "latest", None).unwrap();

        fs::write(dir.path().join("f"), "2").unwrap();
        let c2 = commit(&repo, "two").unwrap();
        tag(&repo, "latest", None).unwrap();

        assert_ne!(c1, c2);
        assert_eq!(resolve_ref(&repo, "latest").unwrap(), c2);
    }

    #[test]
    fn test_tag_invalid_name() {
        let (dir, repo) = test_repo();
        fs::write(dir.path().join("f"), "x").unwrap();
        commit(&repo, "first").unwrap();

        assert!(matches!(
            tag(&repo, "../HEAD", None),
            Err(Error::InvalidRef(_))
        ));
    }
}
