//! Porcelain commands (user-facing operations)
//!
//! Each command is an async method on [`Repository`](crate::areas::repository::Repository)
//! returning a structured outcome; rendering is left to the binary.
//!
//! ## Commands
//!
//! - `init`: Initialize a new repository
//! - `add`: Stage a file for commit
//! - `commit`: Create a new commit from the staged files
//! - `status`: List staged files relative to HEAD
//! - `log`: Show commit history
//! - `show`: Show a commit's files and their diffs against its parent

pub mod add;
pub mod commit;
pub mod init;
pub mod log;
pub mod show;
pub mod status;
