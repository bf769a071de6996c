use crate::areas::repository::Repository;
use crate::errors::{RepositoryError, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    /// The `.twig` directory
    pub path: PathBuf,
    pub already_initialized: bool,
}

impl Repository {
    /// Create the repository layout; an existing repository is left untouched
    pub async fn init(&self) -> Result<InitOutcome> {
        let git_path = self.git_path();

        if let Ok(metadata) = tokio::fs::metadata(&git_path).await {
            if !metadata.is_dir() {
                return Err(RepositoryError::invalid_path(
                    &git_path,
                    "exists and is not a directory",
                ));
            }

            tracing::debug!(path = %git_path.display(), "repository already initialized");
            return Ok(InitOutcome {
                path: git_path,
                already_initialized: true,
            });
        }

        tokio::fs::create_dir_all(self.database().objects_path()).await?;
        self.refs().create_head().await?;

        let index = self.index();
        let index = index.lock().await;
        // create the index file if it does not exist
        if !tokio::fs::try_exists(index.path()).await? {
            tokio::fs::write(index.path(), b"").await?;
        }

        tracing::info!(path = %git_path.display(), "initialized empty repository");
        Ok(InitOutcome {
            path: git_path,
            already_initialized: false,
        })
    }
}
