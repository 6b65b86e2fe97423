//! snapshot operations on tern repositories

mod build_tree;
mod checkout;
mod commit;
mod log;
mod read_tree;
mod tag;

pub use build_tree::{build_tree, write_worktree};
pub use checkout::checkout;
pub use commit::commit;
pub use log::{history, log, History, LogEntry};
pub use read_tree::{materialize, materialize_tree, read_tree};
pub use tag::tag;
