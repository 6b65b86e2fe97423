use std::fs;
use std::path::Path;

use crate::error::{IoResultExt, Result};
use crate::object::store::{get_object, put_object};
use crate::oid::Oid;
use crate::repo::Repo;
use crate::types::ObjectType;

/// store file content as a blob
pub fn write_blob(repo: &Repo, content: &[u8]) -> Result<Oid> {
    put_object(repo, content, ObjectType::Blob)
}

/// store the content of the file at `path` as a blob
pub fn hash_file(repo: &Repo, path: &Path) -> Result<Oid> {
    let content = fs::read(path).with_path(path)?;
    write_blob(repo, &content)
}

/// read blob content
pub fn read_blob(repo: &Repo, oid: &Oid) -> Result<Vec<u8>> {
    let (_, payload) = get_object(repo, oid, Some(ObjectType::Blob))?;
    Ok(payload)
}
