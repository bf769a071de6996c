//! Plumbing commands (low-level object access)
//!
//! ## Commands
//!
//! - `hash-object`: Compute a file's object ID and optionally store it
//! - `cat-file`: Read the raw bytes of a stored object

pub mod cat_file;
pub mod hash_object;
