// src/models/mod.rs

//! Domain models for the collector and publisher.
//!
//! `snapshot` holds the document written to disk and mirrored to Drive;
//! `listing` holds the Reddit API wire format it is assembled from.

mod listing;
mod snapshot;

// Re-export all public types
pub use listing::{CommentData, ListingData, PostData, Thing, TokenResponse, REDDIT_BASE};
pub use snapshot::{Comment, Post, Snapshot, WINDOW_LABEL};
