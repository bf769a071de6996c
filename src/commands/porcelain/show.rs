use crate::areas::repository::Repository;
use crate::artifacts::diff::diff_op::{DiffOp, diff_lines};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowOutcome {
    pub oid: ObjectId,
    pub parent: Option<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
    pub files: Vec<FileChange>,
}

/// One file captured by a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub oid: ObjectId,
    pub content: String,
    /// Line diff against the parent commit's version; `None` when the parent does
    /// not have the path (or there is no parent)
    pub diff: Option<Vec<DiffOp>>,
}

impl FileChange {
    pub fn is_new(&self) -> bool {
        self.diff.is_none()
    }
}

impl Repository {
    /// Describe the commit named by `revision`
    pub async fn show(&self, revision: &str) -> Result<ShowOutcome> {
        self.ensure_initialized().await?;

        let oid = self
            .resolve_revision(revision)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(format!("{revision} has no commits")))?;

        self.show_commit(&oid).await
    }

    pub async fn show_commit(&self, oid: &ObjectId) -> Result<ShowOutcome> {
        let commit = self.database().load_commit(oid).await?;
        let parent = match commit.parent() {
            Some(parent_oid) => Some(self.database().load_commit(parent_oid).await?),
            None => None,
        };

        let mut files = Vec::with_capacity(commit.files().len());
        for entry in commit.files() {
            let content = self.database().load_blob(&entry.oid).await?.text();
            let diff = match parent.as_ref().and_then(|parent| parent.file(&entry.path)) {
                Some(previous) => {
                    let previous = self.database().load_blob(&previous.oid).await?.text();
                    Some(diff_lines(&previous, &content))
                }
                None => None,
            };

            files.push(FileChange {
                path: entry.path.clone(),
                oid: entry.oid.clone(),
                content,
                diff,
            });
        }

        Ok(ShowOutcome {
            oid: oid.clone(),
            parent: commit.parent().cloned(),
            timestamp: commit.timestamp(),
            message: commit.message().to_string(),
            files,
        })
    }
}
