//! In-memory artifact sink for tests and dry runs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use crate::domain::{Artifact, MakeupError};
use crate::ports::outbound::{ArtifactWriter, PublishReceipt};

/// Keeps published files in a map keyed by relative path.
#[derive(Debug, Default)]
pub struct MemoryArtifactWriter {
    files: BTreeMap<PathBuf, Zeroizing<Vec<u8>>>,
    publishes: usize,
}

impl MemoryArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a published file.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(|c| c.as_slice())
    }

    /// Contents of a published file as UTF-8.
    pub fn get_str(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.get(path).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Published paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of successful publish calls.
    pub fn publish_count(&self) -> usize {
        self.publishes
    }
}

impl ArtifactWriter for MemoryArtifactWriter {
    fn publish(&mut self, artifacts: &[Artifact]) -> Result<PublishReceipt, MakeupError> {
        // Each publish replaces the previous set
        self.files = artifacts
            .iter()
            .map(|a| (a.path.clone(), a.contents.clone()))
            .collect();
        self.publishes += 1;

        Ok(PublishReceipt {
            location: PathBuf::from("memory"),
            files: artifacts.len(),
            bytes: artifacts.iter().map(|a| a.contents.len()).sum(),
        })
    }
}
