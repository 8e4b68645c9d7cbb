//! # Filesystem Artifact Writer
//!
//! Publishes the artifact set into `<output>/<network>/` atomically:
//!
//! 1. Stage every file in a temporary sibling directory
//!    (`.netgen-staging-*`) on the same filesystem.
//! 2. Rename the staging directory onto the target.
//!
//! A failure at any step leaves the target untouched and the staging
//! directory is removed on drop. An existing target is refused unless
//! `overwrite` is set; with `overwrite` the old directory is moved aside
//! first and restored if the final rename fails.
//!
//! Files holding secret keys are created with mode `0600` on Unix.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{Artifact, MakeupError};
use crate::ports::outbound::{ArtifactWriter, PublishReceipt};

const STAGING_PREFIX: &str = ".netgen-staging-";
const REPLACED_PREFIX: &str = ".netgen-replaced-";

/// Writes artifacts under a target directory.
#[derive(Debug, Clone)]
pub struct FsArtifactWriter {
    target: PathBuf,
    overwrite: bool,
}

impl FsArtifactWriter {
    /// `target` is the network directory; it must not exist unless
    /// `overwrite` is set.
    pub fn new(target: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            target: target.into(),
            overwrite,
        }
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    fn parent_dir(&self) -> PathBuf {
        match self.target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn stage(&self, root: &Path, artifacts: &[Artifact]) -> Result<usize, MakeupError> {
        let mut bytes = 0;
        for artifact in artifacts {
            let path = root.join(&artifact.path);
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).map_err(|e| MakeupError::io(dir, e))?;
            }
            write_file(&path, &artifact.contents, artifact.secret)
                .map_err(|e| MakeupError::io(&path, e))?;
            bytes += artifact.contents.len();
            debug!(
                path = %artifact.path.display(),
                len = artifact.contents.len(),
                "Staged artifact"
            );
        }
        Ok(bytes)
    }

    fn swap_into_place(&self, staged: &Path, parent: &Path) -> Result<(), MakeupError> {
        if !self.target.exists() {
            return fs::rename(staged, &self.target).map_err(|e| MakeupError::io(&self.target, e));
        }

        let aside = tempfile::Builder::new()
            .prefix(REPLACED_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| MakeupError::io(parent, e))?;
        let previous = aside.path().join("previous");
        fs::rename(&self.target, &previous).map_err(|e| MakeupError::io(&self.target, e))?;

        if let Err(e) = fs::rename(staged, &self.target) {
            if let Err(restore) = fs::rename(&previous, &self.target) {
                warn!(error = %restore, "Failed to restore previous network directory");
            }
            return Err(MakeupError::io(&self.target, e));
        }
        // `aside` drops here and removes the replaced directory
        Ok(())
    }
}

impl ArtifactWriter for FsArtifactWriter {
    fn publish(&mut self, artifacts: &[Artifact]) -> Result<PublishReceipt, MakeupError> {
        if self.target.exists() && !self.overwrite {
            return Err(MakeupError::io(
                &self.target,
                io::Error::new(io::ErrorKind::AlreadyExists, "target directory already exists"),
            ));
        }

        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|e| MakeupError::io(&parent, e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&parent)
            .map_err(|e| MakeupError::io(&parent, e))?;

        let bytes = self.stage(staging.path(), artifacts)?;
        self.swap_into_place(staging.path(), &parent)?;

        info!(
            dir = %self.target.display(),
            files = artifacts.len(),
            bytes,
            "Published network artifacts"
        );

        Ok(PublishReceipt {
            location: self.target.clone(),
            files: artifacts.len(),
            bytes,
        })
    }
}

fn write_file(path: &Path, contents: &[u8], secret: bool) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(if secret { 0o600 } else { 0o644 });
    }
    #[cfg(not(unix))]
    let _ = secret;

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    fn artifact(path: &str, contents: &str, secret: bool) -> Artifact {
        Artifact {
            path: PathBuf::from(path),
            contents: Zeroizing::new(contents.as_bytes().to_vec()),
            secret,
        }
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(".netgen-"))
            .collect()
    }

    #[test]
    fn test_publish_writes_nested_files() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("devnet");
        let mut writer = FsArtifactWriter::new(&target, false);

        let receipt = writer
            .publish(&[
                artifact("extra.dat", "0x00", false),
                artifact("nodes/node0/nodekey", "ab", true),
            ])
            .unwrap();

        assert_eq!(receipt.files, 2);
        assert_eq!(receipt.bytes, 6);
        assert_eq!(fs::read_to_string(target.join("extra.dat")).unwrap(), "0x00");
        assert_eq!(
            fs::read_to_string(target.join("nodes/node0/nodekey")).unwrap(),
            "ab"
        );
        assert!(leftovers(out.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_secret_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("net");
        FsArtifactWriter::new(&target, false)
            .publish(&[artifact("nodekey", "ab", true)])
            .unwrap();

        let mode = fs::metadata(target.join("nodekey")).unwrap().permissions().mode();
        assert_eq!(mode & 0o077, 0);
    }

    #[test]
    fn test_existing_target_refused_without_overwrite() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("net");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "old").unwrap();

        let err = FsArtifactWriter::new(&target, false)
            .publish(&[artifact("extra.dat", "0x", false)])
            .unwrap_err();

        assert_eq!(err.kind(), crate::domain::ErrorKind::Io);
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "old");
        assert!(!target.join("extra.dat").exists());
    }

    #[test]
    fn test_overwrite_replaces_whole_directory() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("net");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        FsArtifactWriter::new(&target, true)
            .publish(&[artifact("extra.dat", "0x01", false)])
            .unwrap();

        assert!(!target.join("stale.txt").exists());
        assert_eq!(fs::read_to_string(target.join("extra.dat")).unwrap(), "0x01");
        assert!(leftovers(out.path()).is_empty());
    }

    #[test]
    fn test_failed_staging_leaves_no_target() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("net");

        // The same path twice trips create_new on the second write
        let err = FsArtifactWriter::new(&target, false)
            .publish(&[
                artifact("extra.dat", "0x", false),
                artifact("extra.dat", "0x", false),
            ])
            .unwrap_err();

        assert_eq!(err.kind(), crate::domain::ErrorKind::Io);
        assert!(!target.exists());
        assert!(leftovers(out.path()).is_empty());
    }
}
