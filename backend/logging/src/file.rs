//! Active log file handle.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Permission bits for newly created log files (owner/group read-write).
pub const FILE_MODE: u32 = 0o660;

/// The file events are currently appended to.
#[derive(Debug)]
pub struct ActiveFile {
    path: PathBuf,
    file: File,
    #[cfg(test)]
    pub(crate) fail_size: bool,
}

impl ActiveFile {
    /// Open `path` for appending, creating it if needed. Never truncates.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(FILE_MODE);
        let file = options.open(&path).await?;
        Ok(Self {
            path,
            file,
            #[cfg(test)]
            fail_size: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current length of the file on disk.
    pub async fn size(&self) -> io::Result<u64> {
        #[cfg(test)]
        if self.fail_size {
            return Err(io::Error::other("size query disabled"));
        }
        Ok(self.file.metadata().await?.len())
    }

    /// Append `bytes` and flush them to the OS.
    pub async fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes).await?;
        self.file.flush().await
    }

    /// Flush pending data and release the handle.
    pub async fn close(mut self) -> io::Result<()> {
        self.file.flush().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("rotalog-file-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_open_creates_and_appends() {
        let dir = scratch_dir();
        let path = dir.join("app.log");

        let mut file = ActiveFile::open(&path).await.unwrap();
        assert_eq!(file.size().await.unwrap(), 0);
        file.write(b"first\n").await.unwrap();
        assert_eq!(file.size().await.unwrap(), 6);
        file.close().await.unwrap();

        let mut file = ActiveFile::open(&path).await.unwrap();
        file.write(b"second\n").await.unwrap();
        file.close().await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_open_never_truncates() {
        let dir = scratch_dir();
        let path = dir.join("app.log");
        std::fs::write(&path, "existing\n").unwrap();

        let file = ActiveFile::open(&path).await.unwrap();
        assert_eq!(file.size().await.unwrap(), 9);
        assert_eq!(file.path(), path.as_path());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_directory_fails() {
        let dir = scratch_dir();
        let err = ActiveFile::open(dir.join("missing").join("app.log"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        std::fs::remove_dir_all(dir).unwrap();
    }
}
