// src/lib.rs

//! topweek Library
//!
//! Collects the week's top posts (and their top-level comments) from a fixed
//! list of subreddits into a JSON snapshot, and publishes snapshots to a
//! Google Drive folder.

pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
