use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::lock::{LockGuard, RepositoryLock};
use crate::areas::refs::Refs;
use crate::config::Config;
use crate::errors::{RepositoryError, Result};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Name of the directory holding repository state
pub const REPOSITORY_DIR: &str = ".twig";

/// Handle on a repository rooted at a working directory
///
/// Every operation goes through this handle; it owns the object database, the index,
/// HEAD and the repository lock. Handles are cheap to create and safe to share between
/// tasks.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    config: Config,
    index: Arc<Mutex<Index>>,
    database: Database,
    refs: Refs,
    lock: RepositoryLock,
}

impl Repository {
    /// Open the repository at `path`, configured from the environment
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(path, Config::load_from_env()?)
    }

    /// Open the repository at an existing directory `path`
    ///
    /// Nothing is created on disk; a missing root fails with `NotInitialized`.
    pub fn with_config(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let path = match path.as_ref().canonicalize() {
            Ok(path) => path,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotInitialized(path.as_ref().to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        let git_path = path.join(REPOSITORY_DIR);

        let index = Index::new(git_path.join("index").into_boxed_path());
        let database = Database::new(git_path.join("objects").into_boxed_path());
        let refs = Refs::new(git_path.clone().into_boxed_path());
        let lock = RepositoryLock::new(
            git_path.join("lock").into_boxed_path(),
            config.lock_timeout,
        );

        Ok(Repository {
            path: path.into_boxed_path(),
            config,
            index: Arc::new(Mutex::new(index)),
            database,
            refs,
            lock,
        })
    }

    /// Working directory root
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `.twig` directory
    pub fn git_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    /// Take the repository lock, waiting at most the configured timeout
    pub async fn lock(&self) -> Result<LockGuard> {
        self.ensure_initialized().await?;
        self.lock.acquire().await
    }

    pub(crate) async fn ensure_initialized(&self) -> Result<()> {
        match tokio::fs::metadata(self.git_path()).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            Ok(_) => Err(RepositoryError::NotInitialized(self.path.to_path_buf())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(RepositoryError::NotInitialized(self.path.to_path_buf()))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolve a user-supplied file path to its absolute location and its
    /// `/`-separated name relative to the repository root
    ///
    /// Relative paths are taken relative to the repository root.
    pub(crate) async fn resolve_workspace_path(&self, path: &Path) -> Result<(PathBuf, String)> {
        let absolute_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        };

        let metadata = match tokio::fs::metadata(&absolute_path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::FileNotFound(path.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };
        if metadata.is_dir() {
            return Err(RepositoryError::invalid_path(path, "is a directory"));
        }

        let absolute_path = tokio::fs::canonicalize(&absolute_path).await?;
        let relative_path = absolute_path
            .strip_prefix(&self.path)
            .map_err(|_| RepositoryError::invalid_path(path, "outside the repository"))?;

        let components = relative_path
            .components()
            .map(|component| match component {
                Component::Normal(name) => name
                    .to_str()
                    .ok_or_else(|| RepositoryError::invalid_path(path, "not valid UTF-8")),
                _ => Err(RepositoryError::invalid_path(path, "not a plain relative path")),
            })
            .collect::<Result<Vec<_>>>()?;

        if components.first() == Some(&REPOSITORY_DIR) {
            return Err(RepositoryError::invalid_path(
                path,
                "inside the repository directory",
            ));
        }
        if components.iter().any(|name| name.contains('\n')) {
            return Err(RepositoryError::invalid_path(path, "contains a newline"));
        }

        let name = components.join("/");
        Ok((absolute_path, name))
    }
}
