//! Medium API client
//!
//! `MediumClient` owns the credentials, the rate limiter and the call
//! counters. It is cheap to clone: resource handles (`User`, `Article`,
//! ...) each hold a clone and issue their own requests through it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::article::Article;
use crate::config::MediumConfig;
use crate::error::MediumError;
use crate::feeds::{LatestPosts, TopFeeds, TopWriters};
use crate::models::FeedMode;
use crate::obs::{
    emit_bulk_fetch_finished, emit_request_completed, emit_retry_scheduled,
    emit_unexpected_status, RequestSpan,
};
use crate::publication::Publication;
use crate::rate_limit::RateLimiter;
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::user::User;
use crate::Result;

/// Response header carrying the plan's request quota
pub const CALL_LIMIT_HEADER: &str = "x-ratelimit-all-endpoints-limit";
/// Response header carrying requests left in the current quota window
pub const REMAINING_CALLS_HEADER: &str = "x-ratelimit-all-endpoints-remaining";

/// Whether a constructor should load the resource's info immediately
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fetch {
    /// Issue the info request before returning the handle
    #[default]
    Eager,
    /// Return an empty handle; fill it later with `fetch_info` or a bulk fetch
    Lazy,
}

/// How a user is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// Immutable user id, e.g. `1985b61817c3`
    Id(String),
    /// Profile handle, resolved through `/user/id_for/{username}`
    Username(String),
}

impl UserRef {
    pub fn id(id: impl Into<String>) -> Self {
        UserRef::Id(id.into())
    }

    pub fn username(username: impl Into<String>) -> Self {
        UserRef::Username(username.into())
    }

    /// Build from optional parts; the id wins when both are given.
    pub fn from_parts(username: Option<String>, user_id: Option<String>) -> Result<Self> {
        match (user_id, username) {
            (Some(id), _) => Ok(UserRef::Id(id)),
            (None, Some(username)) => Ok(UserRef::Username(username)),
            (None, None) => Err(MediumError::InvalidArgument(
                "provide either a username or a user id".to_string(),
            )),
        }
    }
}

/// How a publication is identified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicationRef {
    /// Publication hash id, e.g. `98111c9905da`
    Id(String),
    /// Lowercase hyphenated slug, resolved through `/publication/id_for/{slug}`
    Slug(String),
}

impl PublicationRef {
    pub fn id(id: impl Into<String>) -> Self {
        PublicationRef::Id(id.into())
    }

    pub fn slug(slug: impl Into<String>) -> Self {
        PublicationRef::Slug(slug.into())
    }

    /// Build from optional parts; the id wins when both are given.
    pub fn from_parts(slug: Option<String>, publication_id: Option<String>) -> Result<Self> {
        match (publication_id, slug) {
            (Some(id), _) => Ok(PublicationRef::Id(id)),
            (None, Some(slug)) => Ok(PublicationRef::Slug(slug)),
            (None, None) => Err(MediumError::InvalidArgument(
                "provide either a publication slug or a publication id".to_string(),
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct QuotaSnapshot {
    limit: Option<u64>,
    remaining: Option<u64>,
}

struct ClientInner {
    config: MediumConfig,
    transport: Arc<dyn Transport>,
    limiter: RateLimiter,
    calls: AtomicU64,
    quota: Mutex<QuotaSnapshot>,
}

/// Entry point to every Medium API operation
#[derive(Clone)]
pub struct MediumClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for MediumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediumClient")
            .field("host", &self.inner.config.host)
            .field("calls", &self.calls())
            .field("limiter", &self.inner.limiter)
            .finish()
    }
}

impl MediumClient {
    /// Create a client that talks to the configured host over HTTPS
    pub fn new(config: MediumConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create client from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(MediumConfig::from_env())
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(config: MediumConfig, transport: Arc<dyn Transport>) -> Self {
        let limiter = RateLimiter::new(config.rate_limit_requests, config.rate_limit_period);
        MediumClient {
            inner: Arc::new(ClientInner {
                config,
                transport,
                limiter,
                calls: AtomicU64::new(0),
                quota: Mutex::new(QuotaSnapshot::default()),
            }),
        }
    }

    pub fn config(&self) -> &MediumConfig {
        &self.inner.config
    }

    /// Successful (status 200) responses received so far
    pub fn calls(&self) -> u64 {
        self.inner.calls.load(Ordering::Relaxed)
    }

    /// Plan quota reported by the last response that carried it
    pub fn call_limit(&self) -> Option<u64> {
        self.quota().limit
    }

    /// Remaining quota reported by the last response that carried it
    pub fn remaining_calls(&self) -> Option<u64> {
        self.quota().remaining
    }

    fn quota(&self) -> QuotaSnapshot {
        self.inner
            .quota
            .lock()
            .map(|q| *q)
            .unwrap_or_default()
    }

    /// Absolute URL for an endpoint path
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("https://{}{}", self.inner.config.host, endpoint)
    }

    fn request_for(&self, endpoint: &str) -> ApiRequest {
        ApiRequest {
            url: self.url_for(endpoint),
            headers: vec![
                (
                    "X-RapidAPI-Key".to_string(),
                    self.inner.config.api_key.clone(),
                ),
                ("X-RapidAPI-Host".to_string(), self.inner.config.host.clone()),
                ("User-Agent".to_string(), crate::USER_AGENT.to_string()),
            ],
        }
    }

    fn record_quota(&self, response: &ApiResponse) {
        let limit = response
            .header(CALL_LIMIT_HEADER)
            .and_then(|v| v.trim().parse().ok());
        let remaining = response
            .header(REMAINING_CALLS_HEADER)
            .and_then(|v| v.trim().parse().ok());

        if limit.is_none() && remaining.is_none() {
            return;
        }
        if let Ok(mut quota) = self.inner.quota.lock() {
            if limit.is_some() {
                quota.limit = limit;
            }
            if remaining.is_some() {
                quota.remaining = remaining;
            }
        }
    }

    /// GET an endpoint and return its JSON body.
    ///
    /// A 200 response whose body is an object with an `error` key is
    /// retried after `retry_delay`, at most `max_retries` times. Any other
    /// status fails immediately.
    pub async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let _span = RequestSpan::enter(endpoint);
        let request = self.request_for(endpoint);
        let mut attempt: u32 = 0;

        loop {
            self.inner.limiter.acquire().await;

            let started = Instant::now();
            let response = self.inner.transport.get(&request).await?;
            self.record_quota(&response);
            emit_request_completed(
                endpoint,
                response.status,
                started.elapsed().as_millis() as u64,
                attempt,
            );

            if response.status != 200 {
                emit_unexpected_status(endpoint, response.status);
                return Err(MediumError::Status {
                    status: response.status,
                    body: response.body_text(),
                });
            }

            self.inner.calls.fetch_add(1, Ordering::Relaxed);
            let value: Value = serde_json::from_slice(&response.body)?;

            let message = match value.get("error") {
                None => return Ok(value),
                Some(Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
            };

            if attempt >= self.inner.config.max_retries {
                return Err(MediumError::Api {
                    endpoint: endpoint.to_string(),
                    message,
                });
            }

            attempt += 1;
            let delay = self.inner.config.retry_delay;
            emit_retry_scheduled(endpoint, attempt, delay.as_millis() as u64, &message);
            tokio::time::sleep(delay).await;
        }
    }

    /// GET an endpoint and decode the whole body
    pub(crate) async fn get_as<T: DeserializeOwned>(&self, endpoint: &str) -> Result<(T, Value)> {
        let value = self.get_json(endpoint).await?;
        let decoded = serde_json::from_value(value.clone())?;
        Ok((decoded, value))
    }

    /// GET an endpoint and decode one top-level field
    pub(crate) async fn get_field<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        field: &str,
    ) -> Result<T> {
        let mut value = self.get_json(endpoint).await?;
        let field_value = value
            .get_mut(field)
            .map(Value::take)
            .ok_or_else(|| MediumError::MissingField {
                endpoint: endpoint.to_string(),
                field: field.to_string(),
            })?;
        Ok(serde_json::from_value(field_value)?)
    }

    /// Resolve a username to its immutable user id
    pub async fn resolve_user_id(&self, username: &str) -> Result<String> {
        let username = path_segment(username, "username")?;
        self.get_field(&format!("/user/id_for/{username}"), "id")
            .await
    }

    /// Resolve a publication slug to its id
    pub async fn resolve_publication_id(&self, slug: &str) -> Result<String> {
        let slug = path_segment(slug, "publication slug")?;
        self.get_field(&format!("/publication/id_for/{slug}"), "publication_id")
            .await
    }

    /// Get a `User` handle
    ///
    /// ```ignore
    /// let nishu = medium.user(UserRef::username("nishu-jain"), Fetch::Eager).await?;
    /// ```
    pub async fn user(&self, user: UserRef, fetch: Fetch) -> Result<User> {
        let user_id = match user {
            UserRef::Id(id) => path_segment(&id, "user id")?.to_string(),
            UserRef::Username(username) => self.resolve_user_id(&username).await?,
        };

        let mut handle = User::new(self.clone(), user_id);
        if fetch == Fetch::Eager {
            handle.fetch_info().await?;
        }
        Ok(handle)
    }

    /// Get an `Article` handle for the hash at the end of a story URL
    pub async fn article(&self, article_id: &str, fetch: Fetch) -> Result<Article> {
        let article_id = path_segment(article_id, "article id")?;
        let mut handle = Article::new(self.clone(), article_id.to_string());
        if fetch == Fetch::Eager {
            handle.fetch_info().await?;
        }
        Ok(handle)
    }

    /// Get a `Publication` handle
    pub async fn publication(&self, publication: PublicationRef, fetch: Fetch) -> Result<Publication> {
        let publication_id = match publication {
            PublicationRef::Id(id) => path_segment(&id, "publication id")?.to_string(),
            PublicationRef::Slug(slug) => self.resolve_publication_id(&slug).await?,
        };

        let mut handle = Publication::new(self.clone(), publication_id);
        if fetch == Fetch::Eager {
            handle.fetch_info().await?;
        }
        Ok(handle)
    }

    /// Top writers for a topic such as `artificial-intelligence`
    pub fn top_writers(&self, topic_slug: &str) -> TopWriters {
        TopWriters::new(self.clone(), topic_slug)
    }

    /// Latest posts within a topic
    pub fn latestposts(&self, topic_slug: &str) -> LatestPosts {
        LatestPosts::new(self.clone(), topic_slug)
    }

    /// Ranked feed for a tag
    pub fn topfeeds(&self, tag: &str, mode: FeedMode) -> TopFeeds {
        TopFeeds::new(self.clone(), tag, mode)
    }

    /// Tags related to `tag`
    pub async fn related_tags(&self, tag: &str) -> Result<Vec<String>> {
        let tag = path_segment(tag, "tag")?;
        self.get_field(&format!("/related_tags/{tag}"), "related_tags")
            .await
    }

    /// Fill a list of article handles concurrently.
    ///
    /// Articles whose info is already loaded are skipped. With `content`,
    /// the body text is fetched too for every article lacking it.
    /// Returns the number of articles that needed at least one request.
    pub async fn fetch_articles(&self, articles: &mut [Article], content: bool) -> Result<usize> {
        let started = Instant::now();
        let requested = articles.len();
        let pending: Vec<&mut Article> = articles
            .iter_mut()
            .filter(|a| !a.is_filled() || (content && a.content().is_none()))
            .collect();
        let fetched = pending.len();

        stream::iter(pending)
            .map(move |article| async move {
                if !article.is_filled() {
                    article.fetch_info().await?;
                }
                if content && article.content().is_none() {
                    article.fetch_content().await?;
                }
                Ok::<(), MediumError>(())
            })
            .buffer_unordered(self.inner.config.max_concurrency.max(1))
            .try_collect::<Vec<()>>()
            .await?;

        emit_bulk_fetch_finished(
            "article",
            requested,
            fetched,
            started.elapsed().as_millis() as u64,
        );
        Ok(fetched)
    }

    /// Fill a list of user handles concurrently, skipping filled ones.
    /// Returns the number of users fetched.
    pub async fn fetch_users(&self, users: &mut [User]) -> Result<usize> {
        let started = Instant::now();
        let requested = users.len();
        let pending: Vec<&mut User> = users.iter_mut().filter(|u| !u.is_filled()).collect();
        let fetched = pending.len();

        stream::iter(pending)
            .map(|user| async move { user.fetch_info().await.map(|_| ()) })
            .buffer_unordered(self.inner.config.max_concurrency.max(1))
            .try_collect::<Vec<()>>()
            .await?;

        emit_bulk_fetch_finished(
            "user",
            requested,
            fetched,
            started.elapsed().as_millis() as u64,
        );
        Ok(fetched)
    }

    pub(crate) fn max_concurrency(&self) -> usize {
        self.inner.config.max_concurrency.max(1)
    }
}

/// Validate a value used as a single URL path segment
pub(crate) fn path_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MediumError::InvalidArgument(format!("{what} is empty")));
    }
    if value.contains(|c: char| matches!(c, '/' | '?' | '#') || c.is_whitespace()) {
        return Err(MediumError::InvalidArgument(format!(
            "{what} '{value}' is not a valid path segment"
        )));
    }
    Ok(value)
}
