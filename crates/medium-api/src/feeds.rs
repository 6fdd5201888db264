//! Topic and tag feeds: top feeds, top writers, latest posts.
//!
//! Each feed is a lazily fetched list of ids. The first call to `ids`
//! (or `articles` / `users`) issues the request; later calls reuse it
//! until `refresh`.

use crate::article::Article;
use crate::client::{path_segment, MediumClient};
use crate::models::FeedMode;
use crate::user::User;
use crate::Result;

#[derive(Debug, Clone)]
struct IdFeed {
    client: MediumClient,
    endpoint: String,
    field: &'static str,
    ids: Option<Vec<String>>,
}

impl IdFeed {
    fn new(client: MediumClient, endpoint: String, field: &'static str) -> Self {
        IdFeed {
            client,
            endpoint,
            field,
            ids: None,
        }
    }

    async fn ids(&mut self) -> Result<&[String]> {
        if self.ids.is_none() {
            self.refresh().await?;
        }
        Ok(self.ids.as_deref().unwrap_or_default())
    }

    async fn refresh(&mut self) -> Result<&[String]> {
        let ids: Vec<String> = self.client.get_field(&self.endpoint, self.field).await?;
        Ok(self.ids.insert(ids).as_slice())
    }
}

/// Articles for a tag ranked by `FeedMode` (`/topfeeds/{tag}/{mode}`)
#[derive(Debug, Clone)]
pub struct TopFeeds {
    tag: String,
    mode: FeedMode,
    feed: IdFeed,
}

impl TopFeeds {
    pub(crate) fn new(client: MediumClient, tag: &str, mode: FeedMode) -> Self {
        let tag = tag.trim().to_string();
        let endpoint = format!("/topfeeds/{tag}/{mode}");
        TopFeeds {
            tag,
            mode,
            feed: IdFeed::new(client, endpoint, "topfeeds"),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    /// Article ids, fetched on first use
    pub async fn ids(&mut self) -> Result<&[String]> {
        path_segment(&self.tag, "tag")?;
        self.feed.ids().await
    }

    /// Re-fetch the feed
    pub async fn refresh(&mut self) -> Result<&[String]> {
        path_segment(&self.tag, "tag")?;
        self.feed.refresh().await
    }

    /// Lazy article handles
    pub async fn articles(&mut self) -> Result<Vec<Article>> {
        let ids = self.ids().await?.to_vec();
        Ok(Article::from_ids(&self.feed.client, ids))
    }
}

/// Top writers for a topic (`/top_writers/{topic_slug}`)
#[derive(Debug, Clone)]
pub struct TopWriters {
    topic_slug: String,
    feed: IdFeed,
}

impl TopWriters {
    pub(crate) fn new(client: MediumClient, topic_slug: &str) -> Self {
        let topic_slug = topic_slug.trim().to_string();
        let endpoint = format!("/top_writers/{topic_slug}");
        TopWriters {
            topic_slug,
            feed: IdFeed::new(client, endpoint, "top_writers"),
        }
    }

    pub fn topic_slug(&self) -> &str {
        &self.topic_slug
    }

    /// User ids, fetched on first use
    pub async fn ids(&mut self) -> Result<&[String]> {
        path_segment(&self.topic_slug, "topic slug")?;
        self.feed.ids().await
    }

    /// Re-fetch the ranking
    pub async fn refresh(&mut self) -> Result<&[String]> {
        path_segment(&self.topic_slug, "topic slug")?;
        self.feed.refresh().await
    }

    /// Lazy user handles
    pub async fn users(&mut self) -> Result<Vec<User>> {
        let ids = self.ids().await?.to_vec();
        Ok(User::from_ids(&self.feed.client, ids))
    }
}

/// Newest articles within a topic (`/latestposts/{topic_slug}`)
#[derive(Debug, Clone)]
pub struct LatestPosts {
    topic_slug: String,
    feed: IdFeed,
}

impl LatestPosts {
    pub(crate) fn new(client: MediumClient, topic_slug: &str) -> Self {
        let topic_slug = topic_slug.trim().to_string();
        let endpoint = format!("/latestposts/{topic_slug}");
        LatestPosts {
            topic_slug,
            feed: IdFeed::new(client, endpoint, "latestposts"),
        }
    }

    pub fn topic_slug(&self) -> &str {
        &self.topic_slug
    }

    /// Article ids, fetched on first use
    pub async fn ids(&mut self) -> Result<&[String]> {
        path_segment(&self.topic_slug, "topic slug")?;
        self.feed.ids().await
    }

    /// Re-fetch the feed
    pub async fn refresh(&mut self) -> Result<&[String]> {
        path_segment(&self.topic_slug, "topic slug")?;
        self.feed.refresh().await
    }

    /// Lazy article handles
    pub async fn articles(&mut self) -> Result<Vec<Article>> {
        let ids = self.ids().await?.to_vec();
        Ok(Article::from_ids(&self.feed.client, ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediumConfig;
    use crate::error::MediumError;
    use crate::fakes::MemoryTransport;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(transport: Arc<MemoryTransport>) -> MediumClient {
        let config = MediumConfig::new("test-key").with_rate_limit(0, Duration::ZERO);
        MediumClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn test_topfeeds_is_fetched_once() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_json("/topfeeds/blockchain/new", json!({"topfeeds": ["a1", "a2"]}));
        let client = client(Arc::clone(&transport));

        let mut feed = client.topfeeds("blockchain", FeedMode::New);
        assert_eq!(feed.ids().await.unwrap(), ["a1", "a2"]);
        assert_eq!(feed.articles().await.unwrap().len(), 2);
        assert_eq!(transport.hits("/topfeeds/blockchain/new"), 1);

        feed.refresh().await.unwrap();
        assert_eq!(transport.hits("/topfeeds/blockchain/new"), 2);
    }

    #[tokio::test]
    async fn test_top_writers_path_has_leading_slash() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_json(
            "/top_writers/artificial-intelligence",
            json!({"top_writers": ["u1", "u2", "u3"]}),
        );
        let client = client(Arc::clone(&transport));

        let mut writers = client.top_writers("artificial-intelligence");
        let users = writers.users().await.unwrap();

        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| !u.is_filled()));
        assert_eq!(
            transport.requests()[0].url,
            "https://medium2.p.rapidapi.com/top_writers/artificial-intelligence"
        );
    }

    #[tokio::test]
    async fn test_latestposts() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_json("/latestposts/rust", json!({"latestposts": ["a9"]}));
        let client = client(transport);

        let mut latest = client.latestposts("rust");
        assert_eq!(latest.topic_slug(), "rust");
        assert_eq!(latest.articles().await.unwrap()[0].id(), "a9");
    }

    #[tokio::test]
    async fn test_empty_slug_is_rejected_without_request() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client(Arc::clone(&transport));

        let mut latest = client.latestposts("  ");
        let err = latest.ids().await.unwrap_err();
        assert!(matches!(err, MediumError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }
}
