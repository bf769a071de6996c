//! Index entry representation
//!
//! Each entry maps a repository-relative path (always `/`-separated) to the ID of the
//! blob staged for it.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::OBJECT_ID_RAW_LENGTH;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{Read, Write};

/// Maximum path length supported in index entries
pub const MAX_PATH_SIZE: usize = u16::MAX as usize;

/// Staged file: path plus content ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub path: String,
    /// ID of the blob holding the file content
    pub oid: ObjectId,
}

impl IndexEntry {
    pub(crate) fn read_from<R: Read>(reader: &mut Checksum<R>) -> Result<Self> {
        let oid_bytes = reader.read(OBJECT_ID_RAW_LENGTH)?;
        let oid = ObjectId::from_digest(&oid_bytes)?;

        let path_size = byteorder::NetworkEndian::read_u16(&reader.read(2)?);
        let path = reader.read(path_size as usize)?;
        let path = String::from_utf8(path.to_vec())
            .map_err(|_| RepositoryError::corrupt("index entry path is not valid UTF-8"))?;

        Ok(IndexEntry { path, oid })
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        if self.path.len() > MAX_PATH_SIZE {
            return Err(RepositoryError::invalid_path(
                &self.path,
                "path is too long for the index",
            ));
        }

        let mut bytes = Vec::with_capacity(OBJECT_ID_RAW_LENGTH + 2 + self.path.len());
        self.oid.write_raw_to(&mut bytes)?;
        bytes.write_u16::<byteorder::NetworkEndian>(self.path.len() as u16)?;
        bytes.write_all(self.path.as_bytes())?;

        Ok(Bytes::from(bytes))
    }
}
