pub mod walk;
pub mod write;

pub use walk::{is_excluded, walk_error};
pub use write::{clear_worktree, fsync_dir, write_file};
