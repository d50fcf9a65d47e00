// src/config.rs

//! Application configuration.
//!
//! Configuration is built once at startup and passed by value into the
//! pipelines: an optional `config.toml` provides tunables, environment
//! variables override it, and credentials come from the environment only.
//! Validation happens at construction, before any network call.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Subreddit names are 2-21 characters of `[A-Za-z0-9_]`.
fn is_valid_sub(name: &str) -> bool {
    (2..=21).contains(&name.len()) && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a comma-separated subreddit list, dropping empty segments.
pub fn parse_sub_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a required environment variable.
fn required_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!("{name} is not set"))),
    }
}

/// Collector tunables.
///
/// Loaded from `config.toml` when present, with environment variables
/// (`SUBS`, `LIMIT_PER_SUB`, `SLEEP_BETWEEN_CALLS`) taking precedence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorConfig {
    /// Subreddits to collect, in order
    #[serde(default = "defaults::subs")]
    pub subs: Vec<String>,

    /// Top posts to request per subreddit
    #[serde(default = "defaults::limit_per_sub")]
    pub limit_per_sub: u32,

    /// Top-level comments to request per post
    #[serde(default = "defaults::comment_limit")]
    pub comment_limit: u32,

    /// Politeness delay in seconds, applied after each comment fetch and
    /// after each subreddit's post loop
    #[serde(default = "defaults::sleep_between_calls")]
    pub sleep_between_calls: f64,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            subs: defaults::subs(),
            limit_per_sub: defaults::limit_per_sub(),
            comment_limit: defaults::comment_limit(),
            sleep_between_calls: defaults::sleep_between_calls(),
            timeout_secs: defaults::timeout_secs(),
        }
    }
}

impl CollectorConfig {
    /// Load tunables from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load tunables or return defaults if the file is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if !path.as_ref().exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay environment variables onto the loaded tunables.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = env::var("SUBS") {
            self.subs = parse_sub_list(&raw);
        }
        if let Ok(raw) = env::var("LIMIT_PER_SUB") {
            self.limit_per_sub = raw
                .parse()
                .map_err(|_| AppError::config(format!("LIMIT_PER_SUB is not a number: {raw}")))?;
        }
        if let Ok(raw) = env::var("SLEEP_BETWEEN_CALLS") {
            self.sleep_between_calls = raw.parse().map_err(|_| {
                AppError::config(format!("SLEEP_BETWEEN_CALLS is not a number: {raw}"))
            })?;
        }
        Ok(())
    }

    /// Validate configuration values for basic sanity.
    ///
    /// Rejects empty, duplicate (case-insensitive), and malformed subreddit
    /// names so a bad entry fails at startup rather than inside a request.
    pub fn validate(&self) -> Result<()> {
        if self.subs.is_empty() {
            return Err(AppError::validation("no subreddits configured"));
        }
        let mut seen = HashSet::new();
        for sub in &self.subs {
            if !is_valid_sub(sub) {
                return Err(AppError::validation(format!(
                    "invalid subreddit name: {sub:?}"
                )));
            }
            if !seen.insert(sub.to_ascii_lowercase()) {
                return Err(AppError::validation(format!(
                    "duplicate subreddit name: {sub:?}"
                )));
            }
        }
        if self.limit_per_sub == 0 {
            return Err(AppError::validation("limit_per_sub must be > 0"));
        }
        if self.comment_limit == 0 {
            return Err(AppError::validation("comment_limit must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::validation("timeout_secs must be > 0"));
        }
        if !self.sleep_between_calls.is_finite() || self.sleep_between_calls < 0.0 {
            return Err(AppError::validation("sleep_between_calls must be >= 0"));
        }
        Ok(())
    }
}

/// Reddit API credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

impl RedditCredentials {
    /// Read `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET` and `USER_AGENT`.
    ///
    /// All three are required; fails immediately if any is absent.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client_id: required_env("REDDIT_CLIENT_ID")?,
            client_secret: required_env("REDDIT_CLIENT_SECRET")?,
            user_agent: required_env("USER_AGENT")?,
        })
    }
}

/// Credential material for the Drive publisher.
///
/// The two historical credential schemes are interchangeable; the upload
/// logic never branches on which one is in use.
#[derive(Debug, Clone)]
pub enum DriveCredentials {
    /// Service-account key JSON (`GCP_SA_KEY`)
    ServiceAccount { key_json: String },

    /// User OAuth client secret + stored token JSON
    /// (`GDRIVE_CLIENT_SECRET_JSON` + `GDRIVE_TOKEN_JSON`)
    AuthorizedUser {
        client_secret_json: String,
        token_json: String,
    },
}

/// Publisher configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Target Drive folder id
    pub folder_id: String,

    /// Selected credential scheme
    pub credentials: DriveCredentials,
}

impl PublisherConfig {
    /// Read `GDRIVE_FOLDER_ID` and pick a credential scheme from whichever
    /// variables are present. `GCP_SA_KEY` wins when both schemes are set.
    pub fn from_env() -> Result<Self> {
        let folder_id = required_env("GDRIVE_FOLDER_ID")?;

        let credentials = if let Ok(key_json) = env::var("GCP_SA_KEY") {
            DriveCredentials::ServiceAccount { key_json }
        } else if let (Ok(client_secret_json), Ok(token_json)) = (
            env::var("GDRIVE_CLIENT_SECRET_JSON"),
            env::var("GDRIVE_TOKEN_JSON"),
        ) {
            DriveCredentials::AuthorizedUser {
                client_secret_json,
                token_json,
            }
        } else {
            return Err(AppError::config(
                "set GCP_SA_KEY, or GDRIVE_CLIENT_SECRET_JSON and GDRIVE_TOKEN_JSON",
            ));
        };

        Ok(Self {
            folder_id,
            credentials,
        })
    }
}

mod defaults {
    pub fn subs() -> Vec<String> {
        [
            "sidehustle",
            "passive_income",
            "WorkOnline",
            "EntrepreneurRideAlong",
            "JustStart",
            "Entrepreneur",
            "SmallBusiness",
            "BeerMoney",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn limit_per_sub() -> u32 {
        10
    }
    pub fn comment_limit() -> u32 {
        100
    }
    pub fn sleep_between_calls() -> f64 {
        0.7
    }
    pub fn timeout_secs() -> u64 {
        30
    }
}
