//! Command implementations
//!
//! - `plumbing`: Low-level commands for direct object access (hash-object, cat-file)
//! - `porcelain`: User-facing commands (init, add, commit, status, log, show)

pub mod plumbing;
pub mod porcelain;
