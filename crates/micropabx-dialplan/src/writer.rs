// Copyright (C) 2025 The micropabx authors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Artifact writer.
//!
//! The rendered dialplan is written to a temporary file next to the
//! destination, flushed to disk, then renamed over it. A failed write leaves
//! the previous artifact untouched. Concurrent writers are not guarded:
//! the last rename wins.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;
use tracing::info;

use crate::codegen::statement::Dialplan;

/// Metadata of a written artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    /// Destination path.
    pub path: PathBuf,
    /// Size in bytes.
    pub bytes: usize,
    /// SHA-256 of the content, lowercase hex.
    pub sha256: String,
}

/// Errors writing the artifact.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WriteError {
    /// The destination could not be replaced.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Render and write a dialplan to `path`, replacing previous contents.
pub fn write_artifact(path: impl AsRef<Path>, dialplan: &Dialplan) -> Result<ArtifactInfo, WriteError> {
    write_text(path, &dialplan.render())
}

/// Write already-rendered artifact text to `path`, replacing previous contents.
pub fn write_text(path: impl AsRef<Path>, content: &str) -> Result<ArtifactInfo, WriteError> {
    let path = path.as_ref();
    replace_file(path, content.as_bytes()).map_err(|source| WriteError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let info = ArtifactInfo {
        path: path.to_path_buf(),
        bytes: content.len(),
        sha256: checksum(content),
    };
    info!(
        path = %info.path.display(),
        bytes = info.bytes,
        sha256 = %info.sha256,
        "Artifact written"
    );
    Ok(info)
}

/// SHA-256 of artifact text, lowercase hex.
pub fn checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn replace_file(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;

    // The switch reads the artifact as its own user.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
