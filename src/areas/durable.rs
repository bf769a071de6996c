use crate::errors::{RepositoryError, Result};
use fake::rand;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// Replace `target` with `content` so readers see either the old or the new file
///
/// The content is written to a sibling temp file, flushed to disk and renamed over
/// the target. Once this returns the new content survives a crash.
pub(crate) async fn write_atomically(target: &Path, content: &[u8]) -> Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| RepositoryError::invalid_path(target, "path has no parent directory"))?;
    let temp_path = dir.join(format!("tmp-{}", rand::random::<u32>()));

    let result = write_and_rename(&temp_path, target, content).await;
    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }
    result?;

    sync_dir(dir).await
}

async fn write_and_rename(temp_path: &Path, target: &Path, content: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(temp_path).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(temp_path, target).await?;
    Ok(())
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> Result<()> {
    tokio::fs::File::open(dir).await?.sync_all().await?;
    Ok(())
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
