//! User handle

use serde_json::Value;

use crate::article::Article;
use crate::client::MediumClient;
use crate::models::{UserInfo, UserPublications};
use crate::Result;

/// A Medium user, identified by their immutable user id.
#[derive(Debug, Clone)]
pub struct User {
    client: MediumClient,
    id: String,
    info: Option<UserInfo>,
    raw_info: Option<Value>,
}

impl User {
    pub(crate) fn new(client: MediumClient, id: String) -> Self {
        User {
            client,
            id,
            info: None,
            raw_info: None,
        }
    }

    pub(crate) fn from_ids(client: &MediumClient, ids: Vec<String>) -> Vec<User> {
        ids.into_iter()
            .map(|id| User::new(client.clone(), id))
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn info(&self) -> Option<&UserInfo> {
        self.info.as_ref()
    }

    pub fn raw_info(&self) -> Option<&Value> {
        self.raw_info.as_ref()
    }

    pub fn fullname(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.fullname.as_str())
    }

    pub fn username(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.username.as_str())
    }

    /// Whether info has been loaded
    pub fn is_filled(&self) -> bool {
        self.info.is_some()
    }

    /// Load `/user/{id}`
    pub async fn fetch_info(&mut self) -> Result<&UserInfo> {
        let (info, raw): (UserInfo, Value) =
            self.client.get_as(&format!("/user/{}", self.id)).await?;
        self.raw_info = Some(raw);
        Ok(&*self.info.insert(info))
    }

    /// Ids of every article the user wrote
    pub async fn article_ids(&self) -> Result<Vec<String>> {
        self.list("articles", "associated_articles").await
    }

    /// Lazy handles for every article the user wrote
    pub async fn articles(&self) -> Result<Vec<Article>> {
        let ids = self.article_ids().await?;
        Ok(Article::from_ids(&self.client, ids))
    }

    /// Ids of the user's top articles
    pub async fn top_article_ids(&self) -> Result<Vec<String>> {
        self.list("top_articles", "top_articles").await
    }

    /// Lazy handles for the user's top articles
    pub async fn top_articles(&self) -> Result<Vec<Article>> {
        let ids = self.top_article_ids().await?;
        Ok(Article::from_ids(&self.client, ids))
    }

    /// Ids of users this user follows
    pub async fn following_ids(&self) -> Result<Vec<String>> {
        self.list("following", "following").await
    }

    /// Lazy handles for users this user follows
    pub async fn following(&self) -> Result<Vec<User>> {
        let ids = self.following_ids().await?;
        Ok(User::from_ids(&self.client, ids))
    }

    /// Ids of the user's followers
    pub async fn followers_ids(&self) -> Result<Vec<String>> {
        self.list("followers", "followers").await
    }

    /// Lazy handles for the user's followers
    pub async fn followers(&self) -> Result<Vec<User>> {
        let ids = self.followers_ids().await?;
        Ok(User::from_ids(&self.client, ids))
    }

    /// Tags the user follows
    pub async fn interests(&self) -> Result<Vec<String>> {
        self.list("interests", "tags_followed").await
    }

    /// Publications the user administers or edits
    pub async fn publications(&self) -> Result<UserPublications> {
        self.client
            .get_field(&format!("/user/{}/publications", self.id), "publications")
            .await
    }

    async fn list(&self, sub: &str, field: &str) -> Result<Vec<String>> {
        self.client
            .get_field(&format!("/user/{}/{}", self.id, sub), field)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Fetch, UserRef};
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
    async fn test_user_by_username_resolves_id_then_fetches_info() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .on_json("/user/id_for/nishu-jain", json!({"id": "1985b61817c3"}))
            .on_json(
                "/user/1985b61817c3",
                json!({"id": "1985b61817c3", "username": "nishu-jain", "fullname": "Nishu Jain"}),
            );
        let client = client(Arc::clone(&transport));

        let user = client
            .user(UserRef::username("nishu-jain"), Fetch::Eager)
            .await
            .unwrap();

        assert_eq!(user.id(), "1985b61817c3");
        assert_eq!(user.fullname(), Some("Nishu Jain"));
        assert_eq!(user.username(), Some("nishu-jain"));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_user_by_id_lazy_issues_no_request() {
        let transport = Arc::new(MemoryTransport::new());
        let client = client(Arc::clone(&transport));

        let user = client
            .user(UserRef::id("1985b61817c3"), Fetch::Lazy)
            .await
            .unwrap();

        assert!(!user.is_filled());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_user_lists() {
        let transport = Arc::new(MemoryTransport::new());
        transport
            .on_json("/user/u1/articles", json!({"id": "u1", "associated_articles": ["a1", "a2"]}))
            .on_json("/user/u1/top_articles", json!({"top_articles": ["a2"]}))
            .on_json("/user/u1/following", json!({"following": ["u2"]}))
            .on_json("/user/u1/followers", json!({"followers": ["u3", "u4"]}))
            .on_json("/user/u1/interests", json!({"tags_followed": ["rust"]}))
            .on_json(
                "/user/u1/publications",
                json!({"publications": {"admin_in": ["p1"], "editor_in": []}}),
            );
        let client = client(transport);
        let user = client.user(UserRef::id("u1"), Fetch::Lazy).await.unwrap();

        assert_eq!(user.article_ids().await.unwrap(), vec!["a1", "a2"]);
        assert_eq!(user.articles().await.unwrap().len(), 2);
        assert_eq!(user.top_articles().await.unwrap()[0].id(), "a2");
        assert_eq!(user.following().await.unwrap()[0].id(), "u2");
        assert_eq!(user.followers().await.unwrap().len(), 2);
        assert_eq!(user.interests().await.unwrap(), vec!["rust"]);

        let pubs = user.publications().await.unwrap();
        assert_eq!(pubs.admin_in, vec!["p1"]);
        assert!(pubs.editor_in.is_empty());
    }
}
