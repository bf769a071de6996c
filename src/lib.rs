//! twig: a minimal version control system
//!
//! A content-addressable object store, a staging area, a linear commit history with a
//! single HEAD, and a line diff engine, driven through a [`Repository`] handle:
//!
//! ```no_run
//! # async fn run() -> twig::Result<()> {
//! let repository = twig::Repository::new(".")?;
//! repository.init().await?;
//! repository.add("notes.txt").await?;
//! let commit = repository.commit("first notes").await?;
//! let show = repository.show(commit.oid.as_ref()).await?;
//! # Ok(())
//! # }
//! ```

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod render;

pub use areas::repository::Repository;
pub use errors::{RepositoryError, Result};
