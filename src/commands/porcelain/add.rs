use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Path as recorded in the index, relative to the repository root
    pub path: String,
    pub oid: ObjectId,
}

impl Repository {
    /// Store a file's content and stage it under its path
    ///
    /// Staging a path again replaces its entry.
    pub async fn add(&self, path: impl AsRef<Path>) -> Result<AddOutcome> {
        self.ensure_initialized().await?;
        let (absolute_path, path) = self.resolve_workspace_path(path.as_ref()).await?;

        let content = match tokio::fs::read(&absolute_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::FileNotFound(absolute_path));
            }
            Err(err) => return Err(err.into()),
        };
        let oid = self.database().put(content).await?;

        let _lock = self.lock().await?;
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate().await?;
        let head = self.refs().read_head().await?;
        index.reconcile(head.as_ref());

        index.stage(IndexEntry::new(path.clone(), oid.clone()));
        index.write_updates().await?;

        tracing::debug!(path = %path, oid = %oid, "staged file");
        Ok(AddOutcome { path, oid })
    }
}
