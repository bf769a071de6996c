//! Index file format
//!
//! The index (staging area) lists the files to be captured by the next commit, in
//! the order they were first staged.
//!
//! ## File Format (Version 1)
//!
//! ```text
//! Header (44 bytes):
//!   - Signature: "TWIX" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!   - Base head: commit the entries were staged on top of, zeroes for none (32 bytes)
//!
//! Entries (variable length):
//!   - Blob ID (32 bytes)
//!   - Path length (2 bytes)
//!   - Path, UTF-8
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod index_entry;
pub mod index_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 44;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "TWIX";

/// Index file format version
pub const VERSION: u32 = 1;
