// src/sink/file.rs
// =============================================================================
// Writes the export to a local file.
//
// The bytes go to a temporary file in the destination directory first and
// are then renamed over the final name, so the destination either holds the
// previous export or the complete new one, never half of it.
// =============================================================================

use super::{Delivery, Sink};
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    // Where a delivery with this file name ends up
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Sink for FileSink {
    fn deliver(&self, delivery: &Delivery) -> Result<()> {
        let path = self.path_for(&delivery.file_name);
        write_atomically(&self.dir, &path, delivery.body.as_bytes())?;
        info!(
            path = %path.display(),
            bytes = delivery.body.len(),
            mime = delivery.mime,
            "export written"
        );
        Ok(())
    }
}

fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move export into place at {}", path.display()))?;
    Ok(())
}
