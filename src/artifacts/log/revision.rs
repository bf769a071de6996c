use crate::areas::refs::HEAD_REF_NAME;
use crate::areas::repository::Repository;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};

/// Shortest accepted abbreviation of an object ID
pub const MIN_PREFIX_LENGTH: usize = 4;

const HEAD_ALIAS: &str = "@";

/// Names a commit (or, for plumbing commands, any object)
///
/// Supported forms:
/// - `HEAD`, or its alias `@`
/// - a full 64-character object ID
/// - an unambiguous hex prefix of at least 4 characters
/// - `<revision>^`, the parent of a revision
/// - `<revision>~<n>`, the n-th ancestor of a revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Revision {
    Head,
    Oid(String),
    Parent(Box<Revision>),
    Ancestor(Box<Revision>, usize),
}

impl Revision {
    pub fn try_parse(revision: &str) -> Result<Revision> {
        if let Some(base) = revision.strip_suffix('^') {
            return Ok(Revision::Parent(Box::new(Self::try_parse(base)?)));
        }

        if let Some((base, generations)) = revision.rsplit_once('~')
            && !generations.is_empty()
            && generations.chars().all(|c| c.is_ascii_digit())
        {
            let generations = generations
                .parse()
                .map_err(|_| Self::unknown(revision))?;
            return Ok(Revision::Ancestor(
                Box::new(Self::try_parse(base)?),
                generations,
            ));
        }

        match revision {
            HEAD_REF_NAME | HEAD_ALIAS => Ok(Revision::Head),
            oid if Self::looks_like_oid(oid) => Ok(Revision::Oid(oid.to_ascii_lowercase())),
            _ => Err(Self::unknown(revision)),
        }
    }

    /// Resolve to an object ID
    ///
    /// `HEAD` before the first commit resolves to `None`.
    pub async fn resolve(&self, repository: &Repository) -> Result<Option<ObjectId>> {
        match self {
            Revision::Head => repository.refs().read_head().await,
            Revision::Oid(oid) => Self::resolve_oid(oid, repository).await.map(Some),
            Revision::Parent(base) => {
                let oid = Box::pin(base.resolve(repository)).await?;
                Self::resolve_commit_parent(oid, repository).await
            }
            Revision::Ancestor(base, generations) => {
                let mut oid = Box::pin(base.resolve(repository)).await?;
                for _ in 0..*generations {
                    oid = Self::resolve_commit_parent(oid, repository).await?;
                }

                Ok(oid)
            }
        }
    }

    async fn resolve_commit_parent(
        oid: Option<ObjectId>,
        repository: &Repository,
    ) -> Result<Option<ObjectId>> {
        let Some(oid) = oid else {
            return Ok(None);
        };

        match repository.database().load_commit(&oid).await?.parent() {
            Some(parent) => Ok(Some(parent.clone())),
            None => Err(RepositoryError::NotFound(format!(
                "commit {} has no parent",
                oid.to_short_oid()
            ))),
        }
    }

    async fn resolve_oid(oid: &str, repository: &Repository) -> Result<ObjectId> {
        if oid.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(oid)?;
            if !repository.database().contains(&oid).await? {
                return Err(RepositoryError::NotFound(format!("object {oid}")));
            }
            return Ok(oid);
        }

        let mut candidates = repository.database().find_objects_by_prefix(oid).await?;
        match candidates.len() {
            0 => Err(Self::unknown(oid)),
            1 => Ok(candidates.remove(0)),
            _ => Err(RepositoryError::AmbiguousRevision {
                prefix: oid.to_string(),
                candidates,
            }),
        }
    }

    fn looks_like_oid(s: &str) -> bool {
        (MIN_PREFIX_LENGTH..=OBJECT_ID_LENGTH).contains(&s.len())
            && s.chars().all(|c| c.is_ascii_hexdigit())
    }

    fn unknown(revision: &str) -> RepositoryError {
        RepositoryError::NotFound(format!("revision {revision}"))
    }
}
