// src/services/reddit.rs

//! Reddit API client.
//!
//! Authenticates with the client-credentials grant and fetches weekly top
//! listings plus top-level comments. Auth and post-listing failures are
//! fatal; the comment endpoint's odd payload shapes degrade to an empty
//! list instead.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{CollectorConfig, RedditCredentials};
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentData, ListingData, Post, PostData, Thing, TokenResponse};
use crate::utils::http;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Source of posts and comments for a collector run.
///
/// The seam between the collection pipeline and the live API, so the
/// pipeline's failure handling can be exercised without a network.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch one page of a subreddit's weekly top listing.
    async fn top_posts(&self, sub: &str, limit: u32) -> Result<Vec<Post>>;

    /// Fetch a post's top-level comments, best first.
    async fn top_level_comments(&self, post_id: &str, limit: u32) -> Result<Vec<Comment>>;
}

/// Client for the OAuth-protected Reddit API.
pub struct RedditClient {
    http: reqwest::Client,
    credentials: RedditCredentials,
    token: Option<String>,
}

impl RedditClient {
    /// Create a client with the configured user agent and timeout.
    pub fn new(config: &CollectorConfig, credentials: RedditCredentials) -> Result<Self> {
        let http = http::create_client(&credentials.user_agent, config.timeout_secs)?;
        Ok(Self {
            http,
            credentials,
            token: None,
        })
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// Fatal on any non-success status or network error; no retry.
    pub async fn authenticate(&mut self) -> Result<()> {
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?
            .error_for_status()?;

        let token: TokenResponse = response.json().await?;
        self.token = Some(token.access_token);
        Ok(())
    }

    fn bearer(&self) -> Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::auth("not authenticated; call authenticate() first"))
    }

    /// Fetch one page of a subreddit's weekly top listing.
    ///
    /// No pagination beyond the single requested page.
    pub async fn fetch_top_posts(&self, sub: &str, limit: u32) -> Result<Vec<Post>> {
        let url = format!("{API_BASE}/r/{sub}/top");
        let limit = limit.to_string();
        let listing: Thing<ListingData<PostData>> = self
            .http
            .get(&url)
            .bearer_auth(self.bearer()?)
            .query(&[("t", "week"), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into_post(sub))
            .collect())
    }

    /// Fetch a post's top-level comments, best first.
    ///
    /// `depth=1` keeps the listing to top-level comments only; `sort=top`
    /// matches the post listing's ranking.
    pub async fn fetch_top_level_comments(
        &self,
        post_id: &str,
        limit: u32,
    ) -> Result<Vec<Comment>> {
        let url = format!("{API_BASE}/comments/{post_id}");
        let limit = limit.to_string();
        let payload: Value = self
            .http
            .get(&url)
            .bearer_auth(self.bearer()?)
            .query(&[("limit", limit.as_str()), ("depth", "1"), ("sort", "top")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(parse_comment_payload(payload))
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn top_posts(&self, sub: &str, limit: u32) -> Result<Vec<Post>> {
        self.fetch_top_posts(sub, limit).await
    }

    async fn top_level_comments(&self, post_id: &str, limit: u32) -> Result<Vec<Comment>> {
        self.fetch_top_level_comments(post_id, limit).await
    }
}

/// Extract top-level comments from a comment-endpoint payload.
///
/// The endpoint returns a two-element array: the post listing, then the
/// comment listing. Anything else yields an empty list rather than an
/// error. Children whose kind is not `t1` (`more` stubs, nested listings)
/// are skipped.
pub fn parse_comment_payload(payload: Value) -> Vec<Comment> {
    let Value::Array(mut parts) = payload else {
        return Vec::new();
    };
    if parts.len() < 2 {
        return Vec::new();
    }

    let Ok(listing) = serde_json::from_value::<Thing<ListingData<Value>>>(parts.swap_remove(1))
    else {
        return Vec::new();
    };

    listing
        .data
        .children
        .into_iter()
        .filter(|child| child.kind == "t1")
        .filter_map(|child| serde_json::from_value::<CommentData>(child.data).ok())
        .map(CommentData::into_comment)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn comment_payload() -> Value {
        json!([
            { "kind": "Listing", "data": { "children": [] } },
            { "kind": "Listing", "data": { "children": [
                { "kind": "t1", "data": {
                    "id": "c1", "author": "alice", "score": 30,
                    "body": "Top-level reply",
                    "permalink": "/r/sidehustle/comments/abc/c1/"
                }},
                { "kind": "t1", "data": {
                    "id": "c2", "author": "bob", "score": 12,
                    "body": "Another one",
                    "permalink": "/r/sidehustle/comments/abc/c2/"
                }},
                { "kind": "more", "data": { "count": 57, "children": ["d3", "d4"] } }
            ] } }
        ])
    }

    #[test]
    fn parses_only_t1_children_in_order() {
        let comments = parse_comment_payload(comment_payload());
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, "c1");
        assert_eq!(comments[1].id, "c2");
        assert_eq!(
            comments[0].permalink,
            "https://www.reddit.com/r/sidehustle/comments/abc/c1/"
        );
    }

    #[test]
    fn non_array_payload_yields_empty() {
        assert!(parse_comment_payload(json!({"error": 404})).is_empty());
        assert!(parse_comment_payload(json!("nope")).is_empty());
    }

    #[test]
    fn short_array_payload_yields_empty() {
        assert!(parse_comment_payload(json!([])).is_empty());
        assert!(parse_comment_payload(json!([{ "kind": "Listing", "data": {} }])).is_empty());
    }

    #[test]
    fn malformed_second_element_yields_empty() {
        let payload = json!([{ "kind": "Listing", "data": {} }, 42]);
        assert!(parse_comment_payload(payload).is_empty());
    }
}
