//! Size-triggered rotation of the active file through a numbered backup chain.
//!
//! `app.log` is the active file, `app.log.1` the most recently rotated-out
//! content and `app.log.N` the oldest kept generation.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::file::ActiveFile;

pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// When to rotate and how many generations to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Rotate once the active file reaches this many bytes.
    pub max_file_size: u64,
    /// Number of backup generations kept (`path.1 ..= path.N`).
    pub max_backups: usize,
}

impl RotationPolicy {
    pub fn new(max_file_size: u64, max_backups: usize) -> Self {
        Self {
            max_file_size,
            max_backups,
        }
    }

    pub fn from_megabytes(max_size_mb: u64, max_backups: usize) -> Self {
        Self::new(max_size_mb.saturating_mul(BYTES_PER_MB), max_backups)
    }

    pub fn should_rotate(&self, size: u64) -> bool {
        size >= self.max_file_size
    }
}

/// `<path>.<generation>`
pub fn backup_path(path: &Path, generation: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{generation}"));
    PathBuf::from(name)
}

/// Shift every backup one generation older and move `path` to `path.1`.
///
/// Missing files are skipped. Other rename failures do not stop the shift;
/// the first one is returned once the chain has been walked.
pub async fn shift_backups(path: &Path, max_backups: usize) -> Result<()> {
    let mut first_error = None;

    for generation in (0..max_backups).rev() {
        let from = backup_path(path, generation);
        let to = backup_path(path, generation + 1);
        if let Err(e) = rename_if_exists(&from, &to).await {
            warn!(error = %e, "Backup shift failed, continuing");
            first_error.get_or_insert(e);
        }
    }

    if let Err(e) = rename_if_exists(path, &backup_path(path, 1)).await {
        warn!(error = %e, "Active file rename failed");
        first_error.get_or_insert(e);
    }

    first_error.map_or(Ok(()), Err)
}

async fn rename_if_exists(from: &Path, to: &Path) -> Result<()> {
    match fs::rename(from, to).await {
        Ok(()) => {
            debug!(from = %from.display(), to = %to.display(), "Renamed log file");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(Error::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }),
    }
}

/// The active file plus the rotation state machine around it.
///
/// Callers must serialize access: a write, its size check and a possible
/// rotation form one critical section.
#[derive(Debug)]
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    active: Option<ActiveFile>,
}

impl RotatingFile {
    pub async fn open(path: impl Into<PathBuf>, policy: RotationPolicy) -> Result<Self> {
        let path = path.into();
        let active = ActiveFile::open(&path)
            .await
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            policy,
            active: Some(active),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn policy(&self) -> RotationPolicy {
        self.policy
    }

    #[cfg(test)]
    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveFile> {
        self.active.as_mut()
    }

    /// Append bytes to the active file.
    ///
    /// If a previous rotation could not reopen the file, it is reopened here
    /// first.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let active = match self.active.take() {
            Some(active) => active,
            None => ActiveFile::open(&self.path)
                .await
                .map_err(|source| Error::Reopen {
                    path: self.path.clone(),
                    source,
                })?,
        };
        let active = self.active.insert(active);
        active.write(bytes).await.map_err(Error::Write)
    }

    /// Rotate if the active file has reached the size threshold.
    ///
    /// Returns whether a rotation ran. A failed size query skips rotation for
    /// this cycle.
    pub async fn rotate_if_needed(&mut self) -> Result<bool> {
        let Some(active) = self.active.as_ref() else {
            return Ok(false);
        };
        let size = active.size().await.map_err(Error::Stat)?;
        if !self.policy.should_rotate(size) {
            return Ok(false);
        }
        self.rotate().await?;
        Ok(true)
    }

    /// Close the active file, shift the backup chain and open a fresh file.
    ///
    /// Partial rotations are not rolled back.
    pub async fn rotate(&mut self) -> Result<()> {
        if let Some(active) = self.active.take() {
            if let Err(e) = active.close().await {
                warn!(error = %e, "Flush before rotation failed");
            }
        }

        let shifted = shift_backups(&self.path, self.policy.max_backups).await;

        let reopened = ActiveFile::open(&self.path)
            .await
            .map_err(|source| Error::Reopen {
                path: self.path.clone(),
                source,
            })?;
        self.active = Some(reopened);
        shifted?;

        info!(
            path = %self.path.display(),
            max_backups = self.policy.max_backups,
            "Rotated log file"
        );
        Ok(())
    }
}
