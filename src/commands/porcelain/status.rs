use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

/// How a staged entry compares with the HEAD commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StageState {
    /// HEAD does not have the path
    New,
    /// HEAD has the path with different content
    Modified,
    /// HEAD has the path with the same content
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub oid: ObjectId,
    pub state: StageState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOutcome {
    pub head: Option<ObjectId>,
    /// Staged entries, in staging order
    pub staged: Vec<StatusEntry>,
}

impl Repository {
    /// List what the next commit would capture
    ///
    /// Does not take the repository lock: HEAD and the index are replaced atomically,
    /// and a stale index is only reconciled in memory.
    pub async fn status(&self) -> Result<StatusOutcome> {
        self.ensure_initialized().await?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate().await?;

        let head = self.refs().read_head().await?;
        index.reconcile(head.as_ref());

        let head_commit = match &head {
            Some(oid) => Some(self.database().load_commit(oid).await?),
            None => None,
        };

        let staged = index
            .entries()
            .map(|entry| {
                let state = match head_commit.as_ref().and_then(|commit| commit.file(&entry.path)) {
                    None => StageState::New,
                    Some(committed) if committed.oid == entry.oid => StageState::Unchanged,
                    Some(_) => StageState::Modified,
                };

                StatusEntry {
                    path: entry.path.clone(),
                    oid: entry.oid.clone(),
                    state,
                }
            })
            .collect();

        Ok(StatusOutcome { head, staged })
    }
}
