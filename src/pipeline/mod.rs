//! Pipeline entry points, one per scheduled invocation.
//!
//! - `run_collector`: fetch posts and comments, write the snapshot files
//! - `run_publisher`: mirror the latest snapshot to the Drive folder

pub mod collect;
pub mod publish;

pub use collect::{collect_snapshot, run_collector, CollectOutcome};
pub use publish::{derive_archive_name, run_publisher, PublishOutcome};
