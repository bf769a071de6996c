//! Repository data structures and algorithms
//!
//! - `diff`: line diffs (Myers' algorithm)
//! - `index`: staging area file format
//! - `log`: revision names and history traversal
//! - `objects`: stored object types (blob, commit) and their IDs
//!
//! Nothing here takes the repository lock; see `areas` for persistence and locking.

pub mod diff;
pub mod index;
pub mod log;
pub mod objects;
