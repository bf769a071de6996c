//! Repository lock
//!
//! Every read-modify-write of the index and every HEAD update runs under one
//! repository-wide lock. It has two layers:
//!
//! - an in-process async mutex shared by all handles on the same repository, since
//!   POSIX record locks never conflict between threads of one process
//! - an exclusive `file-guard` lock on `.twig/lock`, excluding other processes
//!
//! Acquisition gives up with `Locked` once the configured timeout has elapsed. The
//! returned [`LockGuard`] releases both layers when dropped, including when the
//! future holding it is cancelled.

use crate::errors::{RepositoryError, Result};
use file_guard::{FileGuard, Lock};
use std::collections::HashMap;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, PoisonError};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;

/// How long to wait between attempts on a contended lock file
const RETRY_INTERVAL: Duration = Duration::from_millis(10);

type ProcessLocks = std::sync::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>;

static PROCESS_LOCKS: LazyLock<ProcessLocks> = LazyLock::new(Default::default);

#[derive(Debug)]
pub struct RepositoryLock {
    path: Box<Path>,
    mutex: Arc<Mutex<()>>,
    timeout: Duration,
}

/// Proof that the repository lock is held
pub struct LockGuard {
    _file: FileGuard<Arc<File>>,
    _mutex: OwnedMutexGuard<()>,
}

impl std::fmt::Debug for LockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard").finish_non_exhaustive()
    }
}

impl RepositoryLock {
    pub fn new(path: Box<Path>, timeout: Duration) -> Self {
        let mutex = PROCESS_LOCKS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(path.to_path_buf())
            .or_default()
            .clone();

        RepositoryLock {
            path,
            mutex,
            timeout,
        }
    }

    pub async fn acquire(&self) -> Result<LockGuard> {
        let deadline = Instant::now() + self.timeout;

        let mutex = tokio::time::timeout_at(deadline, self.mutex.clone().lock_owned())
            .await
            .map_err(|_| RepositoryError::Locked(self.timeout))?;

        loop {
            let file = Arc::new(
                std::fs::OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&self.path)?,
            );

            match file_guard::try_lock(file, Lock::Exclusive, 0, 1) {
                Ok(file) => {
                    tracing::debug!(path = %self.path.display(), "acquired repository lock");
                    return Ok(LockGuard {
                        _file: file,
                        _mutex: mutex,
                    });
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    if Instant::now() + RETRY_INTERVAL > deadline {
                        return Err(RepositoryError::Locked(self.timeout));
                    }
                    tokio::time::sleep(RETRY_INTERVAL).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
