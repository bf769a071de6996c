//! Stored object types
//!
//! Two kinds of objects share the object store, both keyed by the SHA-256 digest of
//! their serialized bytes:
//!
//! - **Blob**: file content, stored as the raw bytes
//! - **Commit**: snapshot record (timestamp, message, staged files, parent commit)

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;

/// Length of a SHA-256 digest in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 64;

/// Length of a SHA-256 digest in bytes
pub const OBJECT_ID_RAW_LENGTH: usize = 32;
