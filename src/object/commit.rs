use crate::error::Result;
use crate::object::store::{get_object, put_object};
use crate::oid::Oid;
use crate::repo::Repo;
use crate::types::{Commit, ObjectType};

/// write a commit to the object store
pub fn write_commit(repo: &Repo, commit: &Commit) -> Result<Oid> {
    put_object(repo, &commit.encode(), ObjectType::Commit)
}

/// read and parse a commit
pub fn read_commit(repo: &Repo, oid: &Oid) -> Result<Commit> {
    let (_, payload) = get_object(repo, oid, Some(ObjectType::Commit))?;
    Commit::parse(oid, &payload)
}
