use std::fmt;

use crate::error::Result;
use crate::object::read_commit;
use crate::oid::Oid;
use crate::refs::head;
use crate::repo::Repo;
use crate::types::Commit;

/// indentation applied to commit messages in log output
const MESSAGE_INDENT: &str = "       ";

/// commit with its oid for log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: Oid,
    pub commit: Commit,
}

/// walks the parent chain, newest first
///
/// the chain is finite because a commit can only name a parent that
/// already existed when it was written. after an error the walk stops.
pub struct History<'a> {
    repo: &'a Repo,
    next: Option<Oid>,
}

impl Iterator for History<'_> {
    type Item = Result<LogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let oid = self.next.take()?;
        match read_commit(self.repo, &oid) {
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok(LogEntry { oid, commit }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// history starting at `start`; empty when `start` is `None`
pub fn history(repo: &Repo, start: Option<Oid>) -> History<'_> {
    History { repo, next: start }
}

/// full history from HEAD, newest first
pub fn log(repo: &Repo) -> Result<Vec<LogEntry>> {
    history(repo, head(repo)?).collect()
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commit {}", self.oid)?;
        for line in self.commit.message.split('\n') {
            if line.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, "{}{}", MESSAGE_INDENT, line)?;
            }
        }
        Ok(())
    }
}
