use crate::areas::repository::Repository;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::log::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Revision to start from; HEAD when absent
    pub start: Option<String>,
    /// Stop after this many commits
    pub max_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub parent: Option<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
    pub message: String,
}

impl LogEntry {
    fn from_commit(oid: ObjectId, commit: Commit) -> Self {
        LogEntry {
            oid,
            parent: commit.parent().cloned(),
            timestamp: commit.timestamp(),
            message: commit.message().to_string(),
        }
    }

    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

impl Repository {
    /// Walk the ancestry of `start`, newest first
    pub fn history(&self, start: Option<ObjectId>) -> RevList<'_> {
        RevList::new(self.database(), start)
    }

    /// Resolve a revision name to a commit or object ID
    ///
    /// `HEAD` resolves to `None` before the first commit.
    pub async fn resolve_revision(&self, revision: &str) -> Result<Option<ObjectId>> {
        Revision::try_parse(revision)?.resolve(self).await
    }

    /// Every commit reachable from HEAD, newest first
    pub async fn log(&self) -> Result<Vec<LogEntry>> {
        self.log_with(&LogOptions::default()).await
    }

    pub async fn log_with(&self, options: &LogOptions) -> Result<Vec<LogEntry>> {
        self.ensure_initialized().await?;

        let start = match &options.start {
            Some(revision) => self.resolve_revision(revision).await?,
            None => self.refs().read_head().await?,
        };
        let max_count = options.max_count.unwrap_or(usize::MAX);

        let mut rev_list = self.history(start);
        let mut entries = Vec::new();
        while entries.len() < max_count {
            let Some((oid, commit)) = rev_list.next_commit().await? else {
                break;
            };
            entries.push(LogEntry::from_commit(oid, commit));
        }

        Ok(entries)
    }
}
