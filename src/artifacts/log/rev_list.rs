use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use futures::Stream;
use std::collections::HashSet;

/// Pull-based walk of a commit's ancestry, newest first
///
/// Each step loads one commit and moves to its parent. The walk ends after the root
/// commit. Reaching a commit twice means the parent chain loops, which fails with
/// `Corrupt`; after any error the cursor yields nothing more.
#[derive(Debug)]
pub struct RevList<'r> {
    database: &'r Database,
    next: Option<ObjectId>,
    visited: HashSet<ObjectId>,
}

impl<'r> RevList<'r> {
    pub fn new(database: &'r Database, start: Option<ObjectId>) -> Self {
        RevList {
            database,
            next: start,
            visited: HashSet::new(),
        }
    }

    pub async fn next_commit(&mut self) -> Result<Option<(ObjectId, Commit)>> {
        let Some(oid) = self.next.take() else {
            return Ok(None);
        };

        if !self.visited.insert(oid.clone()) {
            return Err(RepositoryError::corrupt(format!(
                "commit {oid} is its own ancestor"
            )));
        }

        let commit = self.database.load_commit(&oid).await?;
        self.next = commit.parent().cloned();

        Ok(Some((oid, commit)))
    }

    pub fn into_stream(self) -> impl Stream<Item = Result<(ObjectId, Commit)>> + 'r {
        futures::stream::try_unfold(self, |mut rev_list| async move {
            let entry = rev_list.next_commit().await?;
            Ok::<_, RepositoryError>(entry.map(|entry| (entry, rev_list)))
        })
    }
}
