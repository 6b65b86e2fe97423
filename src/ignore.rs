//! filters deciding which working-directory entries stay out of snapshots

use std::path::Path;

use crate::error::{Error, Result};

/// decides whether an entry of the working directory is ignored
///
/// `rel_path` is relative to the working root, e.g. `src/main.rs`.
/// ignored directories are pruned: nothing below them is visited.
pub trait IgnoreFilter: Send + Sync {
    fn is_ignored(&self, rel_path: &Path) -> bool;
}

impl<F> IgnoreFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_ignored(&self, rel_path: &Path) -> bool {
        self(rel_path)
    }
}

/// filter that ignores nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIgnore;

impl IgnoreFilter for NoIgnore {
    fn is_ignored(&self, _rel_path: &Path) -> bool {
        false
    }
}

/// glob based filter built from config patterns
///
/// a pattern matches if it matches the entry's file name or its
/// slash-joined path relative to the working root.
#[derive(Clone, Debug, Default)]
pub struct GlobIgnore {
    patterns: Vec<glob::Pattern>,
}

impl GlobIgnore {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                glob::Pattern::new(p.as_ref()).map_err(|e| Error::InvalidIgnorePattern {
                    pattern: p.as_ref().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl IgnoreFilter for GlobIgnore {
    fn is_ignored(&self, rel_path: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }

        let name = rel_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let joined = rel_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        self.patterns
            .iter()
            .any(|p| p.matches(&name) || p.matches(&joined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_filter() {
        let filter = |p: &Path| p.extension().is_some_and(|e| e == "tmp");
        assert!(filter.is_ignored(Path::new("a/b.tmp")));
        assert!(!filter.is_ignored(Path::new("a/b.txt")));
    }

    #[test]
    fn test_no_ignore() {
        assert!(!NoIgnore.is_ignored(Path::new(".git")));
    }

    #[test]
    fn test_glob_matches_name_anywhere() {
        let filter = GlobIgnore::new(&["*.swp", "target"]).unwrap();
        assert!(filter.is_ignored(Path::new("notes.swp")));
        assert!(filter.is_ignored(Path::new("deep/dir/notes.swp")));
        assert!(filter.is_ignored(Path::new("target")));
        assert!(filter.is_ignored(Path::new("sub/target")));
        assert!(!filter.is_ignored(Path::new("src/main.rs")));
    }

    #[test]
    fn test_glob_matches_relative_path() {
        let filter = GlobIgnore::new(&["build/*.o"]).unwrap();
        assert!(filter.is_ignored(Path::new("build/main.o")));
        assert!(!filter.is_ignored(Path::new("main.o")));
    }

    #[test]
    fn test_empty_glob() {
        let filter = GlobIgnore::new::<&str>(&[]).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.is_ignored(Path::new("anything")));
    }

    #[test]
    fn test_invalid_pattern() {
        let result = GlobIgnore::new(&["[unclosed"]);
        assert!(matches!(result, Err(Error::InvalidIgnorePattern { .. })));
    }
}
