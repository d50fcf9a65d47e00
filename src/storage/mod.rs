//! Snapshot persistence.
//!
//! One store, two files per run:
//!
//! ```text
//! data/
//! ├── latest.json                        # always the most recent snapshot
//! └── reddit_top_week_YYYY-MM-DD.json    # one per run-day
//! ```

pub mod local;

pub use local::{dated_file_name, LocalStore, SnapshotPaths, LATEST_FILE};
