//! Keyed batch lookups.
//!
//! Each operation takes a list of keys (usernames, ids, tags), issues one
//! request per distinct key concurrently and returns the raw payloads in
//! a `BTreeMap` keyed by the input.

use std::collections::{BTreeMap, BTreeSet};

use futures::stream::{self, StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

use crate::client::{path_segment, MediumClient};
use crate::error::MediumError;
use crate::models::FeedMode;
use crate::Result;

/// Users addressed either by username or by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKeys {
    Usernames(Vec<String>),
    Ids(Vec<String>),
}

impl UserKeys {
    pub fn usernames<S: AsRef<str>>(names: &[S]) -> Self {
        UserKeys::Usernames(names.iter().map(|s| s.as_ref().to_string()).collect())
    }

    pub fn ids<S: AsRef<str>>(ids: &[S]) -> Self {
        UserKeys::Ids(ids.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl MediumClient {
    /// Expand an endpoint template once per argument.
    ///
    /// `template` must contain `{key}` and start with `/`.
    pub fn endpoint_urls<S: AsRef<str>>(&self, template: &str, key: &str, args: &[S]) -> Vec<String> {
        let placeholder = format!("{{{key}}}");
        args.iter()
            .map(|arg| self.url_for(&template.replace(&placeholder, arg.as_ref())))
            .collect()
    }

    async fn fetch_keyed<S: AsRef<str>>(
        &self,
        template: &str,
        key: &str,
        args: &[S],
    ) -> Result<BTreeMap<String, Value>> {
        if !template.starts_with('/') || !template.contains(&format!("{{{key}}}")) {
            return Err(MediumError::InvalidArgument(format!(
                "endpoint template '{template}' must start with '/' and contain '{{{key}}}'"
            )));
        }

        let distinct: BTreeSet<&str> = args
            .iter()
            .map(|a| path_segment(a.as_ref(), key))
            .collect::<Result<_>>()?;
        debug!(template, keys = distinct.len(), "Batch fetch");

        let placeholder = format!("{{{key}}}");
        stream::iter(distinct)
            .map(|arg| {
                let endpoint = template.replace(&placeholder, arg);
                async move {
                    let value = self.get_json(&endpoint).await?;
                    Ok::<_, MediumError>((arg.to_string(), value))
                }
            })
            .buffer_unordered(self.max_concurrency())
            .try_collect()
            .await
    }

    /// Resolve usernames to user ids
    pub async fn users_id<S: AsRef<str>>(&self, usernames: &[S]) -> Result<BTreeMap<String, String>> {
        let payloads = self
            .fetch_keyed("/user/id_for/{username}", "username", usernames)
            .await?;

        payloads
            .into_iter()
            .map(|(username, value)| {
                let id = value
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| MediumError::MissingField {
                        endpoint: format!("/user/id_for/{username}"),
                        field: "id".to_string(),
                    })?
                    .to_string();
                Ok((username, id))
            })
            .collect()
    }

    /// Fetch a per-user endpoint, keyed by whichever user key was given.
    ///
    /// Usernames are resolved first; each distinct id is fetched once and
    /// its payload is filed under every username that resolved to it.
    async fn fetch_per_user(&self, template: &str, keys: UserKeys) -> Result<BTreeMap<String, Value>> {
        let names = match keys {
            UserKeys::Ids(ids) => return self.fetch_keyed(template, "user_id", &ids).await,
            UserKeys::Usernames(names) => names,
        };

        let ids = self.users_id(&names).await?;
        let distinct: Vec<&str> = ids.values().map(String::as_str).collect();
        let by_id = self.fetch_keyed(template, "user_id", &distinct).await?;

        ids.iter()
            .map(|(username, id)| {
                let value = by_id
                    .get(id.trim())
                    .cloned()
                    .ok_or_else(|| MediumError::MissingField {
                        endpoint: template.replace("{user_id}", id),
                        field: username.clone(),
                    })?;
                Ok((username.clone(), value))
            })
            .collect()
    }

    /// `/user/{user_id}` for many users, keyed by the given username or id
    pub async fn users_info(&self, keys: UserKeys) -> Result<BTreeMap<String, Value>> {
        self.fetch_per_user("/user/{user_id}", keys).await
    }

    /// `/user/{user_id}/articles` for many users, keyed by the given username or id
    pub async fn user_articles(&self, keys: UserKeys) -> Result<BTreeMap<String, Value>> {
        self.fetch_per_user("/user/{user_id}/articles", keys)
            .await
    }

    /// `/article/{article_id}` for many articles
    pub async fn article_info<S: AsRef<str>>(&self, article_ids: &[S]) -> Result<BTreeMap<String, Value>> {
        self.fetch_keyed("/article/{article_id}", "article_id", article_ids)
            .await
    }

    /// `/article/{article_id}/content` for many articles
    pub async fn article_content<S: AsRef<str>>(
        &self,
        article_ids: &[S],
    ) -> Result<BTreeMap<String, Value>> {
        self.fetch_keyed("/article/{article_id}/content", "article_id", article_ids)
            .await
    }

    /// `/topfeeds/{tag}/{mode}` for many tags
    pub async fn topfeeds_batch<S: AsRef<str>>(
        &self,
        tags: &[S],
        mode: FeedMode,
    ) -> Result<BTreeMap<String, Value>> {
        let template = format!("/topfeeds/{{tag}}/{mode}");
        self.fetch_keyed(&template, "tag", tags).await
    }

    /// `/top_writers/{topic_slug}` for many topics
    pub async fn top_writers_batch<S: AsRef<str>>(
        &self,
        topic_slugs: &[S],
    ) -> Result<BTreeMap<String, Value>> {
        self.fetch_keyed("/top_writers/{topic_slug}", "topic_slug", topic_slugs)
            .await
    }

    /// `/related_tags/{tag}` for many tags
    pub async fn related_tags_batch<S: AsRef<str>>(&self, tags: &[S]) -> Result<BTreeMap<String, Value>> {
        self.fetch_keyed("/related_tags/{tag}", "tag", tags).await
    }
}
