// src/models/snapshot.rs

//! Snapshot document structures.

use serde::{Deserialize, Serialize};

/// Static label describing the queried time window.
pub const WINDOW_LABEL: &str = "top?t=week (rolling 7 days)";

/// The complete document produced by one collector run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    /// Collection timestamp, ISO-8601 UTC
    pub scraped_at_utc: String,

    /// Description of the time window queried
    pub window: String,

    /// Configured subreddits, in collection order
    pub subs: Vec<String>,

    /// All posts across all subreddits; configured subreddit order first,
    /// then the API's weekly-top ranking within each subreddit
    pub posts: Vec<Post>,
}

/// One post from a subreddit's weekly top listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    /// Subreddit this post was collected from
    pub subreddit: String,

    /// Post id, unique within the subreddit
    pub id: String,

    /// Post title
    pub title: String,

    /// Author name
    pub author: String,

    /// Score at collection time
    pub score: i64,

    /// Comment count reported by the API (all depths)
    pub num_comments: i64,

    /// Creation time, Unix epoch seconds
    pub created_utc: f64,

    /// Full permalink URL
    pub permalink: String,

    /// External URL, or the self-post URL fallback
    pub url: String,

    /// Self-post body (empty for link posts)
    pub selftext: String,

    /// Top-level comments only; nested replies are never collected
    pub top_level_comments: Vec<Comment>,
}

/// A top-level (depth 1) comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    /// Comment id
    pub id: String,

    /// Author name
    pub author: String,

    /// Score at collection time
    pub score: i64,

    /// Comment body text
    pub body: String,

    /// Full permalink URL
    pub permalink: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            scraped_at_utc: "2026-08-30T06:00:00.000000Z".to_string(),
            window: WINDOW_LABEL.to_string(),
            subs: vec!["Entrepreneur".to_string()],
            posts: vec![Post {
                subreddit: "Entrepreneur".to_string(),
                id: "abc123".to_string(),
                title: "Weekly thread — what are you building?".to_string(),
                author: "builder".to_string(),
                score: 512,
                num_comments: 48,
                created_utc: 1756368000.0,
                permalink: "https://www.reddit.com/r/Entrepreneur/comments/abc123/".to_string(),
                url: "https://example.com/launch".to_string(),
                selftext: String::new(),
                top_level_comments: vec![Comment {
                    id: "c1".to_string(),
                    author: "reader".to_string(),
                    score: 17,
                    body: "Congrats on the launch — café ☕".to_string(),
                    permalink: "https://www.reddit.com/r/Entrepreneur/comments/abc123/c1/"
                        .to_string(),
                }],
            }],
        }
    }

    #[test]
    fn snapshot_json_round_trip() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }

    #[test]
    fn snapshot_json_preserves_non_ascii() {
        let snapshot = sample_snapshot();
        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        // serde_json does not escape non-ASCII characters
        assert!(json.contains("café ☕"));
        assert!(!json.contains("\\u"));
    }
}
