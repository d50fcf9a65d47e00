// src/services/drive.rs

//! Google Drive file operations.
//!
//! Upserts by exact file name within a single folder: `latest.json` is
//! updated in place, dated archives are created once and never touched
//! again.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};

const FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const JSON_MIME: &str = "application/json";

/// Multipart boundary for `uploadType=multipart` bodies.
const BOUNDARY: &str = "topweek_upload_boundary";

/// What an upsert did to the remote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    /// Replaced the content of an existing file, keeping its id
    Updated,
    /// Created a new file in the folder
    Created,
}

/// Remote file operations scoped to one folder, keyed by exact name.
///
/// Backends supply the three primitive calls; `upsert` and `archive_once`
/// build the publisher's semantics on top of them.
#[async_trait]
pub trait RemoteFileStore: Send + Sync {
    /// Find a non-trashed file with this exact name in the folder.
    ///
    /// First match wins; name-collision ambiguity is not handled.
    async fn find_file(&self, name: &str) -> Result<Option<String>>;

    /// Replace an existing file's content in place (same id, same metadata).
    async fn update_file(&self, file_id: &str, bytes: Vec<u8>) -> Result<()>;

    /// Create a new file in the folder and return its id.
    async fn create_file(&self, name: &str, bytes: &[u8]) -> Result<String>;

    /// Update-if-exists-else-create, keyed by exact name within the folder.
    async fn upsert(&self, name: &str, bytes: Vec<u8>) -> Result<UpsertAction> {
        match self.find_file(name).await? {
            Some(id) => {
                self.update_file(&id, bytes).await?;
                log::info!("Updated {name}");
                Ok(UpsertAction::Updated)
            }
            None => {
                self.create_file(name, &bytes).await?;
                log::info!("Created {name}");
                Ok(UpsertAction::Created)
            }
        }
    }

    /// Create the file once; skip without any remote write if it exists.
    ///
    /// Returns whether an archive upload happened.
    async fn archive_once(&self, name: &str, bytes: &[u8]) -> Result<bool> {
        if self.find_file(name).await?.is_some() {
            log::info!("Archive {name} already exists; skipping");
            return Ok(false);
        }
        self.create_file(name, bytes).await?;
        log::info!("Archived {name}");
        Ok(true)
    }
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileRef>,
}

#[derive(Debug, Deserialize)]
struct FileRef {
    id: String,
}

/// Client for a single Drive folder.
pub struct DriveClient {
    http: reqwest::Client,
    token: String,
    folder_id: String,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, token: String, folder_id: impl Into<String>) -> Self {
        Self {
            http,
            token,
            folder_id: folder_id.into(),
        }
    }

    /// Escape a file name for embedding in a Drive query literal.
    fn escape_query_value(name: &str) -> String {
        name.replace('\\', "\\\\").replace('\'', "\\'")
    }

    /// Body for a `multipart/related` upload: metadata part, then media.
    fn multipart_related_body(metadata: &str, media: &[u8]) -> Vec<u8> {
        let mut body = Vec::with_capacity(media.len() + metadata.len() + 256);
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Type: {JSON_MIME}; charset=UTF-8\r\n\r\n{metadata}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("--{BOUNDARY}\r\nContent-Type: {JSON_MIME}\r\n\r\n").as_bytes());
        body.extend_from_slice(media);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    /// Turn a non-success response into a `Drive` error with context.
    async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::drive(context, format!("{status}: {body}")))
    }
}

#[async_trait]
impl RemoteFileStore for DriveClient {
    async fn find_file(&self, name: &str) -> Result<Option<String>> {
        let query = format!(
            "name = '{}' and '{}' in parents and trashed = false",
            Self::escape_query_value(name),
            self.folder_id
        );
        let response = self
            .http
            .get(FILES_URL)
            .bearer_auth(&self.token)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?;
        let response = Self::check(response, "files.list").await?;

        let list: FileList = response.json().await?;
        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    async fn update_file(&self, file_id: &str, bytes: Vec<u8>) -> Result<()> {
        let url = format!("{UPLOAD_URL}/{file_id}");
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, JSON_MIME)
            .body(bytes)
            .send()
            .await?;
        Self::check(response, "files.update").await?;
        Ok(())
    }

    async fn create_file(&self, name: &str, bytes: &[u8]) -> Result<String> {
        let metadata = serde_json::json!({
            "name": name,
            "parents": [self.folder_id],
        });
        let body = Self::multipart_related_body(&metadata.to_string(), bytes);

        let response = self
            .http
            .post(UPLOAD_URL)
            .bearer_auth(&self.token)
            .query(&[("uploadType", "multipart"), ("fields", "id")])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;
        let response = Self::check(response, "files.create").await?;

        let created: FileRef = response.json().await?;
        Ok(created.id)
    }
}
