//! HEAD reference
//!
//! HEAD is the only reference: a text file holding the ID of the most recent commit,
//! or nothing before the first commit. It is replaced atomically, so unlocked readers
//! always see a complete value.

use crate::areas::durable::write_atomically;
use crate::areas::lock::LockGuard;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use derive_new::new;
use std::io::ErrorKind;
use std::path::Path;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    /// Read the commit HEAD points to
    ///
    /// A missing or empty HEAD means no commits yet.
    pub async fn read_head(&self) -> Result<Option<ObjectId>> {
        let content = match tokio::fs::read_to_string(self.head_path()).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(RepositoryError::corrupt("HEAD is not valid UTF-8"));
            }
            Err(err) => return Err(err.into()),
        };
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        ObjectId::try_parse(content)
            .map(Some)
            .map_err(|_| RepositoryError::corrupt(format!("HEAD holds an invalid ID: {content}")))
    }

    /// Point HEAD at `oid`
    ///
    /// Requires the repository lock; the new value is durable once this returns.
    pub async fn update_head(&self, _lock: &LockGuard, oid: &ObjectId) -> Result<()> {
        write_atomically(&self.head_path(), oid.as_ref().as_bytes()).await?;
        tracing::debug!(head = %oid, "advanced HEAD");
        Ok(())
    }

    /// Create an empty HEAD unless one exists
    pub(crate) async fn create_head(&self) -> Result<()> {
        if !tokio::fs::try_exists(self.head_path()).await? {
            tokio::fs::write(self.head_path(), b"").await?;
        }
        Ok(())
    }
}
