mod commit;
mod kind;
mod tree;

pub use commit::Commit;
pub use kind::ObjectType;
pub use tree::{validate_entry_name, EntryKind, Tree, TreeEntry};
