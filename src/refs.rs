use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, IoResultExt, Result};
use crate::fs::fsync_dir;
use crate::oid::Oid;
use crate::repo::Repo;

/// ref tracking the current snapshot
pub const HEAD: &str = "HEAD";

/// namespace holding tags
pub const TAGS_PREFIX: &str = "refs/tags/";

/// write a ref (create or update)
///
/// ref_name is relative to the storage root, e.g. `HEAD` or `refs/tags/v1`.
/// the file holds the bare hex oid, no trailing newline.
pub fn write_ref(repo: &Repo, ref_name: &str, oid: &Oid) -> Result<()> {
    validate_ref_name(ref_name)?;

    let ref_path = ref_path(repo, ref_name);

    // ensure parent directories exist
    if let Some(parent) = ref_path.parent() {
        fs::create_dir_all(parent).with_path(parent)?;
    }

    // atomic write: temp -> fsync -> rename
    let tmp_dir = repo.tmp_path();
    fs::create_dir_all(&tmp_dir).with_path(&tmp_dir)?;
    let tmp_path = tmp_dir.join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file
            .write_all(oid.to_hex().as_bytes())
            .with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    fs::rename(&tmp_path, &ref_path).with_path(&ref_path)?;

    // fsync parent directory
    if let Some(parent) = ref_path.parent() {
        fsync_dir(parent)?;
    }

    tracing::debug!(ref_name, %oid, "updated ref");
    Ok(())
}

/// read a ref
///
/// a ref that was never written is `None`, not an error. any other
/// failure to read it is reported as `Error::Io`.
pub fn read_ref(repo: &Repo, ref_name: &str) -> Result<Option<Oid>> {
    validate_ref_name(ref_name)?;

    let ref_path = ref_path(repo, ref_name);

    let content = match fs::read_to_string(&ref_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::Io {
                path: ref_path,
                source: e,
            })
        }
    };

    let hex = content.trim();
    if hex.is_empty() {
        return Ok(None);
    }
    Oid::from_hex(hex).map(Some)
}

/// read the current HEAD commit, if any
pub fn head(repo: &Repo) -> Result<Option<Oid>> {
    read_ref(repo, HEAD)
}

/// ref name for a tag
pub fn tag_ref(name: &str) -> String {
    format!("{}{}", TAGS_PREFIX, name)
}

/// resolve a ref, tag or oid string to an oid
///
/// 64 hex chars are taken as an oid. otherwise the name is looked up as a
/// ref (`HEAD`, `refs/tags/v1`), then as a tag name (`v1`).
pub fn resolve_ref(repo: &Repo, ref_or_oid: &str) -> Result<Oid> {
    if Oid::is_hex_oid(ref_or_oid) {
        return Oid::from_hex(ref_or_oid);
    }

    if let Some(oid) = read_ref(repo, ref_or_oid)? {
        return Ok(oid);
    }

    if !ref_or_oid.starts_with(TAGS_PREFIX) {
        if let Some(oid) = read_ref(repo, &tag_ref(ref_or_oid))? {
            return Ok(oid);
        }
    }

    Err(Error::RefNotFound(ref_or_oid.to_string()))
}

/// list tag names, sorted
pub fn list_tags(repo: &Repo) -> Result<Vec<String>> {
    let tags_dir = repo.path().join(TAGS_PREFIX);
    let mut tags = Vec::new();

    if tags_dir.exists() {
        collect_refs(&tags_dir, &tags_dir, &mut tags)?;
    }

    tags.sort();
    Ok(tags)
}

/// get filesystem path for a ref
fn ref_path(repo: &Repo, ref_name: &str) -> PathBuf {
    repo.path().join(ref_name)
}

/// recursively collect refs from directory
fn collect_refs(base: &Path, dir: &Path, refs: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir).with_path(dir)? {
        let entry = entry.with_path(dir)?;
        let path = entry.path();

        if path.is_dir() {
            collect_refs(base, &path, refs)?;
        } else if path.is_file() {
            if let Ok(rel) = path.strip_prefix(base) {
                refs.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    Ok(())
}

/// validate ref name
fn validate_ref_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidRef("empty ref name".to_string()));
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err(Error::InvalidRef(format!(
            "ref name cannot start or end with '/': {}",
            name
        )));
    }

    if name.contains("//") {
        return Err(Error::InvalidRef(format!(
            "ref name cannot contain '//': {}",
            name
        )));
    }

    if name.contains('\0') || name.contains('\\') {
        return Err(Error::InvalidRef(format!(
            "ref name cannot contain null byte or backslash: {:?}",
            name
        )));
    }

    // check for path traversal
    for component in name.split('/') {
        if component == "." || component == ".." {
            return Err(Error::InvalidRef(format!(
                "ref name cannot contain '.' or '..': {}",
                name
            )));
        }
    }

    Ok(())
}
