//! Core repository components
//!
//! This module contains the stateful building blocks of a repository:
//!
//! - `database`: Content-addressable object store for blobs and commits
//! - `index`: Staging area for the next commit
//! - `refs`: The HEAD pointer
//! - `lock`: Repository-wide advisory lock guarding index and HEAD updates
//! - `repository`: The handle tying everything together

pub(crate) mod durable;
pub mod database;
pub mod index;
pub mod lock;
pub mod refs;
pub mod repository;
