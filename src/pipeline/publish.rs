// src/pipeline/publish.rs

//! Snapshot publishing pipeline.

use chrono::Utc;

use crate::config::PublisherConfig;
use crate::error::{AppError, Result};
use crate::services::{provider_for, DriveClient, RemoteFileStore, UpsertAction};
use crate::storage::{dated_file_name, LocalStore, LATEST_FILE};
use crate::utils::http;

const PUBLISHER_USER_AGENT: &str = "topweek-publisher/0.1";
const PUBLISHER_TIMEOUT_SECS: u64 = 30;

/// Summary of a publisher run.
#[derive(Debug)]
pub struct PublishOutcome {
    /// What happened to the remote `latest.json`
    pub latest: UpsertAction,
    /// Whether a new dated archive was uploaded
    pub archived: bool,
    /// The archive file name for this snapshot's date
    pub archive_name: String,
}

/// Derive the archive file name from the snapshot bytes.
///
/// Uses the `scraped_at_utc` date when the document parses and carries a
/// non-blank timestamp; otherwise falls back to today's UTC date.
pub fn derive_archive_name(bytes: &[u8]) -> String {
    let scraped_at = serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|doc| {
            let value = doc.get("scraped_at_utc")?.as_str()?.trim().to_string();
            if value.is_empty() { None } else { Some(value) }
        });

    let date = match scraped_at {
        Some(ts) => ts.split('T').next().unwrap_or(&ts).to_string(),
        None => Utc::now().format("%Y-%m-%d").to_string(),
    };
    dated_file_name(&date)
}

/// Run the publisher.
///
/// Requires a successful collector run: aborts before any remote call if
/// the local latest file is absent. Then unconditionally upserts
/// `latest.json` in the Drive folder and uploads the dated archive only if
/// no file of that name exists yet; an existing archive is never touched,
/// even when local content differs.
pub async fn run_publisher(
    config: &PublisherConfig,
    store: &LocalStore,
) -> Result<PublishOutcome> {
    let bytes = store.read_latest_bytes().await?.ok_or_else(|| {
        AppError::config(format!(
            "{} not found (collector may have failed)",
            store.latest_path().display()
        ))
    })?;

    let archive_name = derive_archive_name(&bytes);

    let http = http::create_client(PUBLISHER_USER_AGENT, PUBLISHER_TIMEOUT_SECS)?;
    let provider = provider_for(&config.credentials)?;
    let token = provider.access_token(&http).await?;
    let drive = DriveClient::new(http, token, config.folder_id.clone());

    let latest = drive.upsert(LATEST_FILE, bytes.clone()).await?;
    let archived = drive.archive_once(&archive_name, &bytes).await?;

    Ok(PublishOutcome {
        latest,
        archived,
        archive_name,
    })
}
