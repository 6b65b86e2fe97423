use crate::error::Result;
use crate::object::store::{get_object, put_object};
use crate::oid::Oid;
use crate::repo::Repo;
use crate::types::{ObjectType, Tree};

/// write a tree to the object store
pub fn write_tree(repo: &Repo, tree: &Tree) -> Result<Oid> {
    put_object(repo, &tree.encode(), ObjectType::Tree)
}

/// read and parse a single tree object (one directory level)
pub fn load_tree(repo: &Repo, oid: &Oid) -> Result<Tree> {
    let (_, payload) = get_object(repo, oid, Some(ObjectType::Tree))?;
    Tree::parse(oid, &payload)
}
