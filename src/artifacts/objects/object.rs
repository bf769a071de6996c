use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;
use sha2::{Digest, Sha256};

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(bytes: Bytes) -> Result<Self>
    where
        Self: Sized;
}

/// Digest of raw content, the only hash function used to key the store
pub fn hash_content(content: &[u8]) -> ObjectId {
    ObjectId::encode(Sha256::digest(content).as_slice())
}

/// Anything the object database stores
pub trait Object: Packable {
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        Ok(hash_content(&content))
    }
}
