use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nix::fcntl::{Flock, FlockArg};

use crate::config::{Config, ObjectFormat};
use crate::error::{Error, IoResultExt, Result};
use crate::ignore::{GlobIgnore, IgnoreFilter};

/// name of the storage directory inside the working root
pub const STORE_DIR: &str = ".tern";

/// handle to a repository: a working root plus its storage root
///
/// every operation takes the handle explicitly, so several repositories
/// can be open in one process.
#[derive(Clone)]
pub struct Repo {
    worktree: PathBuf,
    path: PathBuf,
    config: Config,
    ignore: Arc<dyn IgnoreFilter>,
}

impl Repo {
    /// initialize a repository in `worktree`
    ///
    /// idempotent: an existing repository is opened unchanged.
    pub fn init(worktree: &Path) -> Result<Self> {
        let path = worktree.join(STORE_DIR);

        std::fs::create_dir_all(path.join("objects")).with_path(&path)?;
        std::fs::create_dir_all(path.join("refs/tags")).with_path(&path)?;
        std::fs::create_dir_all(path.join("tmp")).with_path(&path)?;

        let config_path = path.join("config.toml");
        if !config_path.exists() {
            Config::new().save(&config_path)?;
            tracing::info!("initialized empty repository in {}", path.display());
        } else {
            tracing::debug!("reinitialized existing repository in {}", path.display());
        }

        Self::open(worktree)
    }

    /// open the repository of an existing working root
    pub fn open(worktree: &Path) -> Result<Self> {
        let path = worktree.join(STORE_DIR);
        let objects = path.join("objects");
        if !objects.is_dir() {
            return Err(Error::NoRepo(objects));
        }

        let config_path = path.join("config.toml");
        let config = if config_path.exists() {
            Config::load(&config_path)?
        } else {
            // stores created without a config predate typed oids
            Config::default()
        };

        let ignore = GlobIgnore::new(&config.ignore.patterns)?;

        Ok(Self {
            worktree: worktree.to_path_buf(),
            path,
            config,
            ignore: Arc::new(ignore),
        })
    }

    /// replace the ignore filter
    ///
    /// the storage directory is always excluded, whatever the filter says.
    pub fn with_ignore(mut self, filter: impl IgnoreFilter + 'static) -> Self {
        self.ignore = Arc::new(filter);
        self
    }

    /// storage root path (`<worktree>/.tern`)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// working directory root
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    /// repository configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// digest flavour used for new and existing objects
    pub fn object_format(&self) -> ObjectFormat {
        self.config.core.object_format
    }

    /// path to config.toml
    pub fn config_path(&self) -> PathBuf {
        self.path.join("config.toml")
    }

    /// path to objects directory
    pub fn objects_path(&self) -> PathBuf {
        self.path.join("objects")
    }

    /// path to tmp directory (for atomic writes)
    pub fn tmp_path(&self) -> PathBuf {
        self.path.join("tmp")
    }

    /// path to lock file
    pub fn lock_path(&self) -> PathBuf {
        self.path.join(".lock")
    }

    /// is `rel_path` (relative to the working root) left out of snapshots
    pub fn is_ignored(&self, rel_path: &Path) -> bool {
        rel_path == Path::new(STORE_DIR) || self.ignore.is_ignored(rel_path)
    }

    /// acquire exclusive lock on repository, waiting for other holders
    /// returns a guard that releases the lock on drop
    pub fn lock(&self) -> Result<RepoLock> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        let flock = Flock::lock(file, FlockArg::LockExclusive)
            .map_err(|(_, errno)| std::io::Error::from(errno))
            .with_path(&lock_path)?;

        Ok(RepoLock { flock })
    }

    /// try to acquire exclusive lock, returning None if already locked
    pub fn try_lock(&self) -> Result<Option<RepoLock>> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;

        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(flock) => Ok(Some(RepoLock { flock })),
            Err((_, nix::errno::Errno::EWOULDBLOCK)) => Ok(None),
            Err(_) => Err(Error::LockContention),
        }
    }
}

impl fmt::Debug for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repo")
            .field("worktree", &self.worktree)
            .field("path", &self.path)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// guard that holds repository lock until dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}
// lock is released automatically when Flock is dropped

/// run a function while holding the repository lock
pub fn with_lock<T, F>(repo: &Repo, f: F) -> Result<T>
where
    F: FnOnce() -> Result<T>,
{
    let _lock = repo.lock()?;
    f()
}
