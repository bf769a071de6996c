use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub oid: ObjectId,
    pub parent: Option<ObjectId>,
    pub short_message: String,
    pub files_count: usize,
}

impl CommitOutcome {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Repository {
    /// Record the staged files as a new commit on top of HEAD
    ///
    /// The timestamp comes from `TWIG_COMMIT_DATE` when set, the current time otherwise.
    pub async fn commit(&self, message: &str) -> Result<CommitOutcome> {
        let timestamp = self
            .config()
            .commit_time
            .unwrap_or_else(|| chrono::Local::now().fixed_offset());

        self.commit_at(message, timestamp).await
    }

    /// Commit with an explicit timestamp
    ///
    /// Fails with `EmptyCommit`, leaving HEAD and the index as they were, when nothing
    /// is staged. Otherwise the commit is stored first, HEAD advanced second and the
    /// index cleared last.
    pub async fn commit_at(
        &self,
        message: &str,
        timestamp: DateTime<FixedOffset>,
    ) -> Result<CommitOutcome> {
        let lock = self.lock().await?;
        let index = self.index();
        let mut index = index.lock().await;

        // Load the index file from the disk
        index.rehydrate().await?;
        let parent = self.refs().read_head().await?;
        index.reconcile(parent.as_ref());

        if index.is_empty() {
            return Err(RepositoryError::EmptyCommit);
        }

        let commit = Commit::new(
            parent.clone(),
            timestamp,
            index.entries().cloned().collect(),
            message.to_string(),
        );
        let oid = self.database().store(&commit).await?;
        self.refs().update_head(&lock, &oid).await?;

        index.clear(Some(oid.clone()));
        index.write_updates().await?;

        tracing::info!(
            oid = %oid,
            parent = ?parent,
            files = commit.files().len(),
            "created commit"
        );
        Ok(CommitOutcome {
            oid,
            parent,
            short_message: commit.short_message(),
            files_count: commit.files().len(),
        })
    }
}
