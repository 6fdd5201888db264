//! Article handle

use serde_json::Value;

use crate::client::{Fetch, MediumClient, UserRef};
use crate::models::ArticleInfo;
use crate::user::User;
use crate::Result;

/// A Medium story, identified by the hash at the end of its URL.
///
/// Created empty by `MediumClient::article(.., Fetch::Lazy)` or by list
/// endpoints; filled by `fetch_info` / `fetch_content` or in bulk with
/// `MediumClient::fetch_articles`.
#[derive(Debug, Clone)]
pub struct Article {
    client: MediumClient,
    id: String,
    info: Option<ArticleInfo>,
    raw_info: Option<Value>,
    content: Option<String>,
    markdown: Option<String>,
}

impl Article {
    pub(crate) fn new(client: MediumClient, id: String) -> Self {
        Article {
            client,
            id,
            info: None,
            raw_info: None,
            content: None,
            markdown: None,
        }
    }

    pub(crate) fn from_ids(client: &MediumClient, ids: Vec<String>) -> Vec<Article> {
        ids.into_iter()
            .map(|id| Article::new(client.clone(), id))
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Info loaded by `fetch_info`, if any
    pub fn info(&self) -> Option<&ArticleInfo> {
        self.info.as_ref()
    }

    /// Untyped `/article/{id}` payload, including fields not modelled in `ArticleInfo`
    pub fn raw_info(&self) -> Option<&Value> {
        self.raw_info.as_ref()
    }

    pub fn title(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.title.as_str())
    }

    /// Whether info has been loaded
    pub fn is_filled(&self) -> bool {
        self.info.is_some()
    }

    /// Plain-text body loaded by `fetch_content`
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Markdown body loaded by `fetch_markdown`
    pub fn markdown(&self) -> Option<&str> {
        self.markdown.as_deref()
    }

    /// Load `/article/{id}`
    pub async fn fetch_info(&mut self) -> Result<&ArticleInfo> {
        let (info, raw): (ArticleInfo, Value) =
            self.client.get_as(&format!("/article/{}", self.id)).await?;
        self.raw_info = Some(raw);
        Ok(&*self.info.insert(info))
    }

    /// Load `/article/{id}/content`
    pub async fn fetch_content(&mut self) -> Result<&str> {
        let content: String = self
            .client
            .get_field(&format!("/article/{}/content", self.id), "content")
            .await?;
        Ok(self.content.insert(content).as_str())
    }

    /// Load `/article/{id}/markdown`
    pub async fn fetch_markdown(&mut self) -> Result<&str> {
        let markdown: String = self
            .client
            .get_field(&format!("/article/{}/markdown", self.id), "markdown")
            .await?;
        Ok(self.markdown.insert(markdown).as_str())
    }

    /// Ids of the responses (comment stories) to this article
    pub async fn response_ids(&self) -> Result<Vec<String>> {
        self.client
            .get_field(&format!("/article/{}/responses", self.id), "responses")
            .await
    }

    /// Lazy handles for the responses
    pub async fn responses(&self) -> Result<Vec<Article>> {
        let ids = self.response_ids().await?;
        Ok(Article::from_ids(&self.client, ids))
    }

    /// Ids of users who clapped for this article
    pub async fn fan_ids(&self) -> Result<Vec<String>> {
        self.client
            .get_field(&format!("/article/{}/fans", self.id), "voters")
            .await
    }

    /// Lazy handles for the fans
    pub async fn fans(&self) -> Result<Vec<User>> {
        let ids = self.fan_ids().await?;
        Ok(User::from_ids(&self.client, ids))
    }

    /// Lazy handle for the author, once info is loaded
    pub async fn author(&self) -> Result<Option<User>> {
        match self.info.as_ref().map(|i| i.author.as_str()) {
            Some(author) if !author.is_empty() => self
                .client
                .user(UserRef::id(author), Fetch::Lazy)
                .await
                .map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MediumConfig;
    use crate::fakes::MemoryTransport;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(transport: Arc<MemoryTransport>) -> MediumClient {
        let config = MediumConfig::new("test-key").with_rate_limit(0, Duration::ZERO);
        MediumClient::with_transport(config, transport)
    }

    #[tokio::test]
    async fn test_lazy_article_is_empty_until_fetched() {
        let transport = Arc::new(MemoryTransport::new());
        transport.on_json(
            "/article/562c5821b5f0",
            json!({"id": "562c5821b5f0", "title": "About Me", "author": "1985b61817c3"}),
        );
        let client = client(Arc::clone(&transport));

        let mut article = client.article("562c5821b5f0", Fetch::Lazy).await.unwrap();
        assert!(!article.is_filled());
        assert_eq!(transport.requests().len(), 0);

        article.fetch_info().await.unwrap();
        assert_eq!(article.title(), Some("About Me"));
        assert_eq!(article.raw_info().unwrap()["author"], "1985b61817c3");

        let author = article.author().await.unwrap().unwrap();
        assert_eq!(author.id(), "1985b61817c3");
        assert!(!author.is_filled());
    }

    #[tokio::test]
    async fn test_content_and_markdown() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .on_json("/article/abc/content", json!({"content": "Hello"}))
            .on_json("/article/abc/markdown", json!({"markdown": "# Hello"}));
        let client = client(transport);

        let mut article = client.article("abc", Fetch::Lazy).await.unwrap();
        assert_eq!(article.fetch_content().await.unwrap(), "Hello");
        assert_eq!(article.fetch_markdown().await.unwrap(), "# Hello");
        assert_eq!(article.content(), Some("Hello"));
        assert_eq!(article.markdown(), Some("# Hello"));
    }

    #[tokio::test]
    async fn test_responses_and_fans() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .on_json("/article/abc/responses", json!({"responses": ["r1", "r2"]}))
            .on_json("/article/abc/fans", json!({"voters": ["u1"]}));
        let client = client(transport);

        let article = client.article("abc", Fetch::Lazy).await.unwrap();
        let responses = article.responses().await.unwrap();
        assert_eq!(
            responses.iter().map(Article::id).collect::<Vec<_>>(),
            vec!["r1", "r2"]
        );
        let fans = article.fans().await.unwrap();
        assert_eq!(fans[0].id(), "u1");
    }

    #[tokio::test]
    async fn test_author_unknown_before_fetch() {
        let client = client(Arc::new(MemoryTransport::new()));
        let article = client.article("abc", Fetch::Lazy).await.unwrap();
        assert!(article.author().await.unwrap().is_none());
    }
}
