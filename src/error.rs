use std::path::PathBuf;

use crate::oid::Oid;
use crate::types::ObjectType;

/// error type for tern operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a tern repository (missing {0})")]
    NoRepo(PathBuf),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("invalid ref name: {0}")]
    InvalidRef(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Oid),

    #[error("object {oid} is a {actual}, expected {expected}")]
    TypeMismatch {
        oid: Oid,
        expected: ObjectType,
        actual: ObjectType,
    },

    #[error("corrupt object: hash mismatch for {0}")]
    CorruptObject(Oid),

    #[error("malformed object {oid}: {message}")]
    MalformedObject { oid: Oid, message: String },

    #[error("malformed commit {oid}: {message}")]
    MalformedCommit { oid: Oid, message: String },

    #[error("tree entry escapes target directory: {0:?}")]
    PathTraversal(String),

    #[error("invalid tree entry name: {0}")]
    InvalidEntryName(String),

    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("unknown object type: {0}")]
    InvalidObjectType(String),

    #[error("lock contention on repository")]
    LockContention,

    #[error("invalid ignore pattern {pattern:?}: {message}")]
    InvalidIgnorePattern { pattern: String, message: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// missing object, ref or repository
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ObjectNotFound(_) | Error::RefNotFound(_) | Error::NoRepo(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
