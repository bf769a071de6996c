//! Commit history
//!
//! - `revision`: parsing and resolving revision names (`HEAD`, `@`, IDs, prefixes,
//!   `^` and `~n` suffixes)
//! - `rev_list`: walking the parent chain from a starting commit, newest first
//!
//! History is linear: every commit has at most one parent.

pub mod rev_list;
pub mod revision;
