//! Local filesystem snapshot store.
//!
//! Writes each run's snapshot to a dated file and a fixed latest pointer
//! under the data directory. Writes go through a temp file and rename so a
//! scheduler-overlapped reader never observes a half-written snapshot.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Snapshot;

/// Fixed name of the latest-pointer file.
pub const LATEST_FILE: &str = "latest.json";

/// Dated snapshot/archive file name for a `YYYY-MM-DD` date.
pub fn dated_file_name(date: &str) -> String {
    format!("reddit_top_week_{date}.json")
}

/// Paths written by one snapshot persist.
#[derive(Debug, Clone)]
pub struct SnapshotPaths {
    pub dated: PathBuf,
    pub latest: PathBuf,
}

/// Local filesystem storage rooted at the data directory.
#[derive(Clone)]
pub struct LocalStore {
    root_dir: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Path of the latest-pointer file.
    pub fn latest_path(&self) -> PathBuf {
        self.root_dir.join(LATEST_FILE)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// The snapshot's own UTC date, falling back to today.
    fn snapshot_date(snapshot: &Snapshot) -> String {
        let date = snapshot
            .scraped_at_utc
            .split('T')
            .next()
            .unwrap_or_default();
        if date.len() == 10 {
            date.to_string()
        } else {
            Utc::now().format("%Y-%m-%d").to_string()
        }
    }

    /// Serialize the snapshot (pretty-printed, non-ASCII preserved) and
    /// write both the dated file and the latest pointer, overwriting
    /// either if present.
    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<SnapshotPaths> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        let paths = SnapshotPaths {
            dated: self
                .root_dir
                .join(dated_file_name(&Self::snapshot_date(snapshot))),
            latest: self.latest_path(),
        };

        self.write_bytes(&paths.dated, &bytes).await?;
        self.write_bytes(&paths.latest, &bytes).await?;
        Ok(paths)
    }

    /// Read and parse the latest snapshot, or `None` if it was never written.
    pub async fn read_latest(&self) -> Result<Option<Snapshot>> {
        match self.read_latest_bytes().await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Raw bytes of the latest file (what the publisher uploads).
    pub async fn read_latest_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.latest_path()).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
