//! Object database
//!
//! Write-once store keyed by the SHA-256 of each object's bytes. Blobs and commits
//! live side by side under `.twig/objects/<aa>/<rest>`; there is no update or delete.

use crate::areas::durable::write_atomically;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable, hash_content};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use bytes::Bytes;
use derive_new::new;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, new)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Digest of `content`; pure, touches nothing on disk
    pub fn hash(content: &[u8]) -> ObjectId {
        hash_content(content)
    }

    /// Store `content` under its digest unless it is already present
    ///
    /// Writing the same content twice leaves a single copy and returns the same ID.
    pub async fn put(&self, content: impl Into<Bytes>) -> Result<ObjectId> {
        let content = content.into();
        let object_id = Self::hash(&content);
        let object_path = self.path.join(object_id.to_path());

        if tokio::fs::try_exists(&object_path).await? {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .ok_or_else(|| RepositoryError::invalid_path(&object_path, "invalid object path"))?;
        tokio::fs::create_dir_all(object_dir).await?;
        write_atomically(&object_path, &content).await?;

        tracing::debug!(oid = %object_id, size = content.len(), "stored object");
        Ok(object_id)
    }

    pub async fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.put(object.serialize()?).await
    }

    pub async fn contains(&self, object_id: &ObjectId) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.path.join(object_id.to_path())).await?)
    }

    /// Read the bytes stored under `object_id`
    ///
    /// Fails with `NotFound` when nothing is stored there and with `Corrupt` when the
    /// bytes no longer hash to their key.
    pub async fn get(&self, object_id: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(object_id.to_path());

        let content = match tokio::fs::read(&object_path).await {
            Ok(content) => Bytes::from(content),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(format!("object {object_id}")));
            }
            Err(err) => return Err(err.into()),
        };

        if Self::hash(&content) != *object_id {
            return Err(RepositoryError::corrupt(format!(
                "object {object_id} does not match its digest"
            )));
        }

        Ok(content)
    }

    pub async fn load_blob(&self, object_id: &ObjectId) -> Result<Blob> {
        Blob::deserialize(self.get(object_id).await?)
    }

    /// Load a commit record; an object that is not a commit is `Corrupt`
    pub async fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        Commit::deserialize(self.get(object_id).await?).map_err(|err| match err {
            RepositoryError::Corrupt(reason) => {
                RepositoryError::corrupt(format!("{object_id} is not a commit: {reason}"))
            }
            other => other,
        })
    }

    /// Find all objects whose ID starts with the given hex prefix.
    ///
    /// Used to resolve abbreviated IDs. An empty result means no match; more than one
    /// result means the prefix is ambiguous.
    ///
    /// # Performance
    ///
    /// - For prefixes of 2+ characters, only searches the matching fan-out directory
    /// - Shorter prefixes scan every fan-out directory
    pub async fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(matches);
        }

        let dir_names = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dir_names {
            let dir_path = self.path.join(&dir_name);
            let mut entries = match tokio::fs::read_dir(&dir_path).await {
                Ok(entries) => entries,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(err.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let full_oid = format!("{}{}", dir_name, entry.file_name().to_string_lossy());

                // skip temp files left behind by interrupted writes
                if full_oid.len() != OBJECT_ID_LENGTH || !full_oid.starts_with(&prefix) {
                    continue;
                }
                if let Ok(oid) = ObjectId::try_parse(full_oid) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}
