// In crates/dashboard/src/writer.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Destination for rendered artifacts. Paths are relative to the sink's root.
pub trait ArtifactSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Writes artifacts to disk under `root`, creating directories as needed.
#[derive(Debug, Clone)]
pub struct FsSink {
    root: PathBuf,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|source| Error::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&target, bytes).map_err(|source| Error::WriteError {
            path: target.clone(),
            source,
        })?;
        tracing::debug!(path = %target.display(), bytes = bytes.len(), "Artifact written.");
        Ok(())
    }
}
