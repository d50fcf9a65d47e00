// src/models/listing.rs

//! Reddit API wire format.
//!
//! The API wraps everything in kind-tagged "Thing" envelopes; listings hold
//! a vector of children. Only the fields the snapshot needs are modeled, and
//! absent optional fields default to empty string / zero.

use serde::Deserialize;

use crate::models::{Comment, Post};

/// Base URL used to expand relative permalinks.
pub const REDDIT_BASE: &str = "https://www.reddit.com";

/// Kind-tagged envelope (`t1` = comment, `t3` = post, `Listing`, `more`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// Payload of a `Listing` thing.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

/// Response from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Post fields of a `t3` listing entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub url_overridden_by_dest: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub selftext: Option<String>,
}

impl PostData {
    /// Convert a listing entry into a snapshot post for `subreddit`.
    ///
    /// The external URL prefers `url_overridden_by_dest` when present and
    /// non-empty, falling back to `url` (the self-post link for text posts).
    pub fn into_post(self, subreddit: &str) -> Post {
        Post {
            subreddit: subreddit.to_string(),
            id: self.id,
            title: self.title,
            author: self.author,
            score: self.score,
            num_comments: self.num_comments,
            created_utc: self.created_utc,
            permalink: format!("{REDDIT_BASE}{}", self.permalink),
            url: self
                .url_overridden_by_dest
                .filter(|u| !u.is_empty())
                .or(self.url)
                .unwrap_or_default(),
            selftext: self.selftext.unwrap_or_default(),
            top_level_comments: Vec::new(),
        }
    }
}

/// Comment fields of a `t1` listing entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub permalink: String,
}

impl CommentData {
    /// Convert a comment listing entry into a snapshot comment.
    pub fn into_comment(self) -> Comment {
        Comment {
            id: self.id,
            author: self.author,
            score: self.score,
            body: self.body.unwrap_or_default(),
            permalink: format!("{REDDIT_BASE}{}", self.permalink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_listing_deserializes_and_maps() {
        let json = r#"{
            "kind": "Listing",
            "data": {
                "children": [{
                    "kind": "t3",
                    "data": {
                        "id": "abc123",
                        "title": "Launched my side project",
                        "author": "builder",
                        "score": 42,
                        "num_comments": 7,
                        "created_utc": 1756300000.0,
                        "permalink": "/r/sidehustle/comments/abc123/launched/",
                        "url": "https://example.com/project",
                        "selftext": ""
                    }
                }]
            }
        }"#;

        let listing: Thing<ListingData<PostData>> = serde_json::from_str(json).unwrap();
        assert_eq!(listing.data.children.len(), 1);

        let post = listing.data.children[0]
            .data
            .clone()
            .into_post("sidehustle");
        assert_eq!(post.subreddit, "sidehustle");
        assert_eq!(
            post.permalink,
            "https://www.reddit.com/r/sidehustle/comments/abc123/launched/"
        );
        assert_eq!(post.url, "https://example.com/project");
        assert!(post.top_level_comments.is_empty());
    }

    #[test]
    fn post_defaults_absent_fields() {
        let data: PostData = serde_json::from_str(r#"{"id": "x1"}"#).unwrap();
        let post = data.into_post("JustStart");
        assert_eq!(post.title, "");
        assert_eq!(post.score, 0);
        assert_eq!(post.selftext, "");
        assert_eq!(post.url, "");
    }

    #[test]
    fn post_url_prefers_override_but_skips_empty() {
        let data: PostData = serde_json::from_str(
            r#"{"id": "x2", "url_overridden_by_dest": "https://dest.example", "url": "https://orig.example"}"#,
        )
        .unwrap();
        assert_eq!(data.into_post("s").url, "https://dest.example");

        let data: PostData = serde_json::from_str(
            r#"{"id": "x3", "url_overridden_by_dest": "", "url": "https://orig.example"}"#,
        )
        .unwrap();
        assert_eq!(data.into_post("s").url, "https://orig.example");
    }

    #[test]
    fn comment_null_body_becomes_empty() {
        let data: CommentData =
            serde_json::from_str(r#"{"id": "c1", "author": "a", "score": 1, "body": null}"#)
                .unwrap();
        let comment = data.into_comment();
        assert_eq!(comment.body, "");
        assert_eq!(comment.permalink, "https://www.reddit.com");
    }
}
