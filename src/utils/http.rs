// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;

/// Create a configured HTTP client.
///
/// Every outbound call carries the given user agent; the timeout bounds
/// each request (there is no cancellation beyond it).
pub fn create_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}
