//! tern - local content-addressed snapshot store
//!
//! records snapshots of a working directory in a storage root
//! (`<worktree>/.tern`) with git-like commits, tags and checkout.
//!
//! # Core concepts
//!
//! - **Blob**: raw file content
//! - **Tree**: a directory listing, one `<type> <oid> <name>` line per entry
//! - **Commit**: a root tree, an optional parent and a message
//! - **Ref**: a file holding a single oid (`HEAD`, `refs/tags/<name>`)
//!
//! # Object format
//!
//! objects are stored at `objects/<oid>` as `type | 0x00 | payload`.
//! the oid is the sha256 of the stored bytes for repositories created with
//! the typed format (the default), or of the payload alone for legacy ones.
//!
//! # Example usage
//!
//! ```no_run
//! use tern::{ops, Repo};
//! use std::path::Path;
//!
//! let repo = Repo::init(Path::new("/path/to/project")).unwrap();
//!
//! // snapshot the working directory
//! let first = ops::commit(&repo, "initial commit").unwrap();
//!
//! // walk history from HEAD
//! for entry in ops::log(&repo).unwrap() {
//!     print!("{}", entry);
//! }
//!
//! // restore the snapshot and tag it
//! ops::checkout(&repo, &first).unwrap();
//! ops::tag(&repo, "v1", None).unwrap();
//! ```

mod config;
mod error;
mod ignore;
mod object;
mod oid;
mod refs;
mod repo;

pub mod fs;
pub mod ops;
pub mod types;

pub use config::{Config, CoreConfig, IgnoreConfig, ObjectFormat};
pub use error::{Error, Result};
pub use ignore::{GlobIgnore, IgnoreFilter, NoIgnore};
pub use object::{
    get_object, hash_file, load_tree, object_exists, object_path, put_object, read_blob,
    read_commit, write_blob, write_commit, write_tree,
};
pub use oid::{compute_oid, Oid};
pub use refs::{head, list_tags, read_ref, resolve_ref, tag_ref, write_ref, HEAD, TAGS_PREFIX};
pub use repo::{with_lock, Repo, RepoLock, STORE_DIR};
pub use types::{Commit, EntryKind, ObjectType, Tree, TreeEntry};
