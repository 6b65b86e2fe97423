pub mod blob;
pub mod commit;
pub mod store;
pub mod tree;

pub use blob::{hash_file, read_blob, write_blob};
pub use commit::{read_commit, write_commit};
pub use store::{get_object, object_exists, object_path, put_object};
pub use tree::{load_tree, write_tree};
