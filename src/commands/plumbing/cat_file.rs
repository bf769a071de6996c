use crate::areas::repository::Repository;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;

impl Repository {
    /// Raw bytes of the object named by `revision`, after the integrity check
    pub async fn cat_file(&self, revision: &str) -> Result<Bytes> {
        self.ensure_initialized().await?;

        let oid = self
            .resolve_revision(revision)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("{revision} has no commits")))?;

        self.database().get(&oid).await
    }
}
