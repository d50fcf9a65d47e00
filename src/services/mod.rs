//! Service layer: remote API clients.
//!
//! This module contains the clients for:
//! - The Reddit API (`RedditClient`)
//! - Google Drive uploads (`DriveClient`)
//! - Drive credential schemes (`AccessTokenProvider` implementations)

mod auth;
mod drive;
mod reddit;

pub use auth::{provider_for, AccessTokenProvider, AuthorizedUserProvider, ServiceAccountProvider};
pub use drive::{DriveClient, RemoteFileStore, UpsertAction};
pub use reddit::{parse_comment_payload, PostSource, RedditClient};
