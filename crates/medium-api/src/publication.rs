//! Publication handle

use serde_json::Value;

use crate::article::Article;
use crate::client::MediumClient;
use crate::models::{Newsletter, PublicationInfo};
use crate::Result;

/// A Medium publication, identified by its hash id.
#[derive(Debug, Clone)]
pub struct Publication {
    client: MediumClient,
    id: String,
    info: Option<PublicationInfo>,
    raw_info: Option<Value>,
}

impl Publication {
    pub(crate) fn new(client: MediumClient, id: String) -> Self {
        Publication {
            client,
            id,
            info: None,
            raw_info: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn info(&self) -> Option<&PublicationInfo> {
        self.info.as_ref()
    }

    pub fn raw_info(&self) -> Option<&Value> {
        self.raw_info.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.name.as_str())
    }

    pub fn is_filled(&self) -> bool {
        self.info.is_some()
    }

    /// Load `/publication/{id}`
    pub async fn fetch_info(&mut self) -> Result<&PublicationInfo> {
        let (info, raw): (PublicationInfo, Value) = self
            .client
            .get_as(&format!("/publication/{}", self.id))
            .await?;
        self.raw_info = Some(raw);
        Ok(&*self.info.insert(info))
    }

    /// Ids of the publication's recent articles
    pub async fn article_ids(&self) -> Result<Vec<String>> {
        self.client
            .get_field(
                &format!("/publication/{}/articles", self.id),
                "publication_articles",
            )
            .await
    }

    /// Lazy handles for the publication's recent articles
    pub async fn articles(&self) -> Result<Vec<Article>> {
        let ids = self.article_ids().await?;
        Ok(Article::from_ids(&self.client, ids))
    }

    /// The publication's newsletter
    pub async fn newsletter(&self) -> Result<Newsletter> {
        let (newsletter, _raw): (Newsletter, Value) = self
            .client
            .get_as(&format!("/publication/{}/newsletter", self.id))
            .await?;
        Ok(newsletter)
    }
}
