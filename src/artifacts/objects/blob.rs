//! Blob object
//!
//! Blobs store file content. They hold only the raw bytes; the path a blob was staged
//! under lives in the index and in commit records.
//!
//! ## Format
//!
//! On disk the blob is exactly its content, so its digest is `SHA-256(content)`.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::errors::Result;
use bytes::Bytes;
use derive_new::new;

/// File content as stored in the object database
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    #[new(into)]
    content: Bytes,
}

impl Blob {
    /// Raw content bytes
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Content decoded as text, with invalid UTF-8 replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

impl Packable for Blob {
    fn serialize(&self) -> Result<Bytes> {
        Ok(self.content.clone())
    }
}

impl Unpackable for Blob {
    fn deserialize(bytes: Bytes) -> Result<Self> {
        Ok(Self::new(bytes))
    }
}

impl Object for Blob {}
