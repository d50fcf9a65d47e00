// src/pipeline/collect.rs

//! Snapshot collection pipeline.

use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::{CollectorConfig, RedditCredentials};
use crate::error::Result;
use crate::models::{Snapshot, WINDOW_LABEL};
use crate::services::{PostSource, RedditClient};
use crate::storage::LocalStore;

/// Summary of a collector run.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Posts collected across all subreddits
    pub post_count: usize,
    /// Posts whose comment fetch failed and were given an empty list
    pub comment_failures: usize,
}

/// Run the collector against the live Reddit API.
///
/// Authenticates once, then hands off to [`collect_snapshot`].
pub async fn run_collector(
    config: &CollectorConfig,
    credentials: RedditCredentials,
    store: &LocalStore,
) -> Result<CollectOutcome> {
    let mut client = RedditClient::new(config, credentials)?;
    client.authenticate().await?;
    log::info!("Authenticated to the Reddit API");

    collect_snapshot(config, &client, store).await
}

/// Assemble and persist one snapshot from an authenticated source.
///
/// Walks the configured subreddits in order: fetch the weekly top posts
/// (fatal on failure), then for each post sleep the politeness delay and
/// fetch its top-level comments. One more delay follows each subreddit's
/// post loop. The assembled snapshot is written to the dated and latest
/// paths.
pub async fn collect_snapshot(
    config: &CollectorConfig,
    source: &dyn PostSource,
    store: &LocalStore,
) -> Result<CollectOutcome> {
    // Timestamp of collection, captured at the start of the run.
    let scraped_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    // Negative or non-finite delays collapse to zero; validate() rejects
    // them before a configured run gets here.
    let delay = Duration::try_from_secs_f64(config.sleep_between_calls).unwrap_or_default();

    let mut outcome = CollectOutcome::default();
    let mut posts = Vec::new();

    for sub in &config.subs {
        let mut sub_posts = source.top_posts(sub, config.limit_per_sub).await?;
        // The listing endpoint honors the limit; cap locally so the
        // per-sub bound holds regardless.
        sub_posts.truncate(config.limit_per_sub as usize);
        log::info!("Fetched {} top posts from r/{}", sub_posts.len(), sub);

        for mut post in sub_posts {
            tokio::time::sleep(delay).await;

            // A single bad post must not abort the run: a failed comment
            // fetch becomes an empty list and a counted failure.
            match source.top_level_comments(&post.id, config.comment_limit).await {
                Ok(comments) => post.top_level_comments = comments,
                Err(error) => {
                    outcome.comment_failures += 1;
                    log::warn!("Failed to fetch comments for post {}: {}", post.id, error);
                }
            }
            posts.push(post);
        }

        tokio::time::sleep(delay).await;
    }

    let snapshot = Snapshot {
        scraped_at_utc,
        window: WINDOW_LABEL.to_string(),
        subs: config.subs.clone(),
        posts,
    };

    let paths = store.write_snapshot(&snapshot).await?;
    outcome.post_count = snapshot.posts.len();

    log::info!(
        "Wrote {} and {} with {} posts",
        paths.dated.display(),
        paths.latest.display(),
        outcome.post_count
    );
    if outcome.comment_failures > 0 {
        log::warn!(
            "{} post(s) carry an empty comment list due to fetch failures",
            outcome.comment_failures
        );
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Comment, Post};
    use async_trait::async_trait;
    use tempfile::TempDir;

    fn post(sub: &str, id: &str) -> Post {
        Post {
            subreddit: sub.to_string(),
            id: id.to_string(),
            title: format!("Post {id}"),
            author: "author".to_string(),
            score: 10,
            num_comments: 3,
            created_utc: 1756368000.0,
            permalink: format!("https://www.reddit.com/r/{sub}/comments/{id}/"),
            url: format!("https://example.com/{id}"),
            selftext: String::new(),
            top_level_comments: Vec::new(),
        }
    }

    /// Serves a fixed number of posts per subreddit; comment fetches for
    /// one designated post id fail with a timeout.
    struct FakeSource {
        posts_per_sub: usize,
        failing_post: Option<String>,
    }

    #[async_trait]
    impl PostSource for FakeSource {
        async fn top_posts(&self, sub: &str, _limit: u32) -> Result<Vec<Post>> {
            Ok((0..self.posts_per_sub)
                .map(|i| post(sub, &format!("{sub}{i}")))
                .collect())
        }

        async fn top_level_comments(&self, post_id: &str, _limit: u32) -> Result<Vec<Comment>> {
            if self.failing_post.as_deref() == Some(post_id) {
                return Err(std::io::Error::from(std::io::ErrorKind::TimedOut).into());
            }
            Ok(vec![Comment {
                id: format!("{post_id}c0"),
                author: "commenter".to_string(),
                score: 5,
                body: "reply".to_string(),
                permalink: format!("https://www.reddit.com/r/x/comments/{post_id}/c0/"),
            }])
        }
    }

    fn test_config(subs: &[&str], limit_per_sub: u32) -> CollectorConfig {
        CollectorConfig {
            subs: subs.iter().map(|s| s.to_string()).collect(),
            limit_per_sub,
            comment_limit: 5,
            sleep_between_calls: 0.0,
            timeout_secs: 30,
        }
    }

    #[tokio::test]
    async fn failed_comment_fetch_keeps_post_with_empty_list() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = test_config(&["sidehustle"], 2);
        let source = FakeSource {
            posts_per_sub: 2,
            failing_post: Some("sidehustle1".to_string()),
        };

        let outcome = collect_snapshot(&config, &source, &store).await.unwrap();
        assert_eq!(outcome.post_count, 2);
        assert_eq!(outcome.comment_failures, 1);

        let snapshot = store.read_latest().await.unwrap().unwrap();
        assert_eq!(snapshot.posts.len(), 2);
        assert_eq!(snapshot.posts[0].top_level_comments.len(), 1);
        assert!(snapshot.posts[1].top_level_comments.is_empty());
    }

    #[tokio::test]
    async fn post_count_per_sub_never_exceeds_limit() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let config = test_config(&["WorkOnline", "BeerMoney"], 3);
        // Over-returning source: five posts available per subreddit.
        let source = FakeSource {
            posts_per_sub: 5,
            failing_post: None,
        };

        let outcome = collect_snapshot(&config, &source, &store).await.unwrap();
        assert_eq!(outcome.post_count, 6);
        assert_eq!(outcome.comment_failures, 0);

        let snapshot = store.read_latest().await.unwrap().unwrap();
        for sub in &config.subs {
            let per_sub = snapshot
                .posts
                .iter()
                .filter(|p| &p.subreddit == sub)
                .count();
            assert!(per_sub <= config.limit_per_sub as usize);
        }
    }

    #[tokio::test]
    async fn invalid_sleep_value_does_not_panic() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStore::new(tmp.path());
        let mut config = test_config(&["sidehustle"], 1);
        config.sleep_between_calls = -0.5;
        let source = FakeSource {
            posts_per_sub: 1,
            failing_post: None,
        };

        let outcome = collect_snapshot(&config, &source, &store).await.unwrap();
        assert_eq!(outcome.post_count, 1);
    }
}
