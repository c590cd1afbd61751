//! Sequential writer for temp download files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writer for a temp download file, finalized by renaming onto the real name.
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
}

impl StorageWriter {
    /// Create a new temp file at `temp_path` (see [`super::temp_path`]).
    /// Overwrites a stale temp file left by an interrupted run.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(StorageWriter {
            file,
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Append `data` to the temp file.
    pub fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .with_context(|| format!("write {}", self.temp_path.display()))
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<()> {
        self.file.sync_all().context("storage sync failed")?;
        Ok(())
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path;
        drop(self.file);

        std::fs::rename(&temp_path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                temp_path.display(),
                final_path.display()
            )
        })?;
        tracing::debug!(path = %final_path.display(), "finalized download");
        Ok(())
    }
}
