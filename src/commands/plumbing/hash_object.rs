use crate::areas::database::Database;
use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use std::io::ErrorKind;
use std::path::Path;

impl Repository {
    /// Object ID of a file's content, stored as well when `write` is set
    ///
    /// Relative paths are taken relative to the repository root.
    pub async fn hash_object(&self, path: impl AsRef<Path>, write: bool) -> Result<ObjectId> {
        let path = self.path().join(path.as_ref());

        // read object file
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::FileNotFound(path));
            }
            Err(err) => return Err(err.into()),
        };

        if !write {
            return Ok(Database::hash(&content));
        }

        self.ensure_initialized().await?;
        self.database().put(content).await
    }
}
