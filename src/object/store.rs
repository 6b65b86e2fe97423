use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, IoResultExt, Result};
use crate::fs::fsync_dir;
use crate::oid::{compute_oid, Oid, TYPE_SEPARATOR};
use crate::repo::Repo;
use crate::types::ObjectType;

/// write an object to the store
///
/// stored content is `type | 0x00 | payload` at `objects/<oid>`.
/// writing the same object twice is a no-op.
pub fn put_object(repo: &Repo, payload: &[u8], kind: ObjectType) -> Result<Oid> {
    let oid = compute_oid(repo.object_format(), kind, payload);
    let path = object_path(repo, &oid);

    // dedup: if object already exists, we're done
    if path.exists() {
        tracing::trace!(%oid, %kind, "object already stored");
        return Ok(oid);
    }

    let objects_dir = repo.objects_path();
    fs::create_dir_all(&objects_dir).with_path(&objects_dir)?;

    // atomic write: temp -> fsync -> rename
    let tmp_dir = repo.tmp_path();
    fs::create_dir_all(&tmp_dir).with_path(&tmp_dir)?;
    let tmp_path = tmp_dir.join(uuid::Uuid::new_v4().to_string());
    {
        let mut tmp_file = File::create(&tmp_path).with_path(&tmp_path)?;
        tmp_file
            .write_all(kind.as_str().as_bytes())
            .with_path(&tmp_path)?;
        tmp_file.write_all(&[TYPE_SEPARATOR]).with_path(&tmp_path)?;
        tmp_file.write_all(payload).with_path(&tmp_path)?;
        tmp_file.sync_all().with_path(&tmp_path)?;
    }

    fs::rename(&tmp_path, &path).with_path(&path)?;
    fsync_dir(&objects_dir)?;

    tracing::debug!(%oid, %kind, size = payload.len(), "stored object");
    Ok(oid)
}

/// read an object from the store
///
/// when `expected` is given the stored type must match it.
pub fn get_object(
    repo: &Repo,
    oid: &Oid,
    expected: Option<ObjectType>,
) -> Result<(ObjectType, Vec<u8>)> {
    let path = object_path(repo, oid);

    let mut content = fs::read(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::ObjectNotFound(*oid)
        } else {
            Error::Io {
                path: path.clone(),
                source: e,
            }
        }
    })?;

    let sep = content
        .iter()
        .position(|b| *b == TYPE_SEPARATOR)
        .ok_or_else(|| Error::MalformedObject {
            oid: *oid,
            message: "missing type separator".to_string(),
        })?;

    let kind = ObjectType::from_bytes(&content[..sep]).ok_or_else(|| Error::MalformedObject {
        oid: *oid,
        message: format!(
            "unknown type tag {:?}",
            String::from_utf8_lossy(&content[..sep])
        ),
    })?;

    let payload = content.split_off(sep + 1);

    // verify hash
    if compute_oid(repo.object_format(), kind, &payload) != *oid {
        return Err(Error::CorruptObject(*oid));
    }

    if let Some(expected) = expected {
        if kind != expected {
            return Err(Error::TypeMismatch {
                oid: *oid,
                expected,
                actual: kind,
            });
        }
    }

    Ok((kind, payload))
}

/// get the filesystem path to an object
pub fn object_path(repo: &Repo, oid: &Oid) -> PathBuf {
    repo.objects_path().join(oid.to_hex())
}

/// check if an object exists in the store
pub fn object_exists(repo: &Repo, oid: &Oid) -> bool {
    object_path(repo, oid).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectFormat;
    use tempfile::tempdir;

    fn test_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        (dir, repo)
    }

    fn legacy_repo() -> (tempfile::TempDir, Repo) {
        let dir = tempdir().unwrap();
        let repo = Repo::init(dir.path()).unwrap();
        let mut config = repo.config().clone();
        config.core.object_format = ObjectFormat::Legacy;
        config.save(&repo.config_path()).unwrap();
        let repo = Repo::open(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn test_put_and_get() {
        let (_dir, repo) = test_repo();

        let oid = put_object(&repo, b"hello world", ObjectType::Blob).unwrap();
        assert!(object_exists(&repo, &oid));

        let (kind, payload) = get_object(&repo, &oid, None).unwrap();
        assert_eq!(kind, ObjectType::Blob);
        assert_eq!(payload, b"hello world");
    }

    #[test]
    fn test_stored_layout() {
        let (_dir, repo) = test_repo();

        let oid = put_object(&repo, b"hi", ObjectType::Blob).unwrap();
        assert_eq!(oid.to_hex().len(), 64);

        let raw = fs::read(object_path(&repo, &oid)).unwrap();
        assert_eq!(raw, b"blob\0hi");
    }

    #[test]
    fn test_put_idempotent() {
        let (_dir, repo) = test_repo();

        let h1 = put_object(&repo, b"same bytes", ObjectType::Blob).unwrap();
        let h2 = put_object(&repo, b"same bytes", ObjectType::Blob).unwrap();
        assert_eq!(h1, h2);

        let (_, payload) = get_object(&repo, &h1, Some(ObjectType::Blob)).unwrap();
        assert_eq!(payload, b"same bytes");

        // no staging files left behind
        assert_eq!(fs::read_dir(repo.tmp_path()).unwrap().count(), 0);
    }

    #[test]
    fn test_payload_with_separator_bytes() {
        let (_dir, repo) = test_repo();

        let data = b"\0binary\0data\0";
        let oid = put_object(&repo, data, ObjectType::Blob).unwrap();
        let (_, payload) = get_object(&repo, &oid, None).unwrap();
        assert_eq!(payload, data);
    }

    #[test]
    fn test_empty_payload() {
        let (_dir, repo) = test_repo();

        let oid = put_object(&repo, b"", ObjectType::Tree).unwrap();
        let (kind, payload) = get_object(&repo, &oid, Some(ObjectType::Tree)).unwrap();
        assert_eq!(kind, ObjectType::Tree);
        assert!(payload.is_empty());
    }

    #[test]
    fn test_get_missing() {
        let (_dir, repo) = test_repo();

        let result = get_object(&repo, &Oid::from_bytes([7; 32]), None);
        assert!(matches!(result, Err(Error::ObjectNotFound(_))));
    }

    #[test]
    fn test_type_mismatch() {
        let (_dir, repo) = test_repo();

        let oid = put_object(&repo, b"content", ObjectType::Blob).unwrap();
        let result = get_object(&repo, &oid, Some(ObjectType::Commit));
        assert!(matches!(
            result,
            Err(Error::TypeMismatch {
                expected: ObjectType::Commit,
                actual: ObjectType::Blob,
                ..
            })
        ));
    }

    #[test]
    fn test_typed_format_separates_blob_and_tree() {
        let (_dir, repo) = test_repo();

        let blob = put_object(&repo, b"x", ObjectType::Blob).unwrap();
        let tree = put_object(&repo, b"x", ObjectType::Tree).unwrap();
        assert_ne!(blob, tree);
        assert!(get_object(&repo, &tree, Some(ObjectType::Tree)).is_ok());
    }

    #[test]
    fn test_legacy_format_collides() {
        let (_dir, repo) = legacy_repo();

        let blob = put_object(&repo, b"hi", ObjectType::Blob).unwrap();
        assert_eq!(
            blob.to_hex(),
            "8f434346648f6b96df89dda901c5176b10a6d83961dd3c1ac88b59b2dc327aa4"
        );

        // first writer wins; the tree put is deduplicated onto the blob
        let tree = put_object(&repo, b"hi", ObjectType::Tree).unwrap();
        assert_eq!(blob, tree);
        assert!(matches!(
            get_object(&repo, &tree, Some(ObjectType::Tree)),
            Err(Error::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_corrupt_object_detected() {
        let (_dir, repo) = test_repo();

        let oid = put_object(&repo, b"original", ObjectType::Blob).unwrap();
        fs::write(object_path(&repo, &oid), b"blob\0tampered").unwrap();

        let result = get_object(&repo, &oid, None);
        assert!(matches!(result, Err(Error::CorruptObject(_))));
    }

    #[test]
    fn test_malformed_object() {
        let (_dir, repo) = test_repo();

        let oid = Oid::from_bytes([9; 32]);
        fs::write(object_path(&repo, &oid), b"no separator here").unwrap();
        assert!(matches!(
            get_object(&repo, &oid, None),
            Err(Error::MalformedObject { .. })
        ));

        fs::write(object_path(&repo, &oid), b"label\0payload").unwrap();
        assert!(matches!(
            get_object(&repo, &oid, None),
            Err(Error::MalformedObject { .. })
        ));
    }
}
