//! Medium API client library
//!
//! Typed access to the Medium API published on RapidAPI
//! (`medium2.p.rapidapi.com`).
//!
//! ```ignore
//! use medium_api::{Fetch, MediumClient, MediumConfig, UserRef};
//!
//! let medium = MediumClient::new(MediumConfig::new("YOUR_RAPIDAPI_KEY"))?;
//! let nishu = medium.user(UserRef::username("nishu-jain"), Fetch::Eager).await?;
//! let mut articles = nishu.articles().await?;
//! medium.fetch_articles(&mut articles, false).await?;
//! println!("{} calls", medium.calls());
//! ```
//!
//! Layers, bottom up:
//! - `transport`: the HTTP seam (`reqwest` in production, `fakes` in tests)
//! - `rate_limit`: n-requests-per-period throttling
//! - `client`: headers, retries, quota tracking, bulk fills
//! - `user`, `article`, `publication`, `feeds`: lazily filled handles
//! - `batch`: keyed concurrent lookups returning raw payloads

pub mod article;
pub mod article_id;
pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod fakes;
pub mod feeds;
pub mod models;
pub mod obs;
pub mod publication;
pub mod rate_limit;
pub mod telemetry;
pub mod transport;
pub mod user;

pub use article::Article;
pub use article_id::extract_article_id;
pub use batch::UserKeys;
pub use client::{
    Fetch, MediumClient, PublicationRef, UserRef, CALL_LIMIT_HEADER, REMAINING_CALLS_HEADER,
};
pub use config::{MediumConfig, DEFAULT_HOST};
pub use error::{MediumError, Result};
pub use feeds::{LatestPosts, TopFeeds, TopWriters};
pub use models::{
    ArticleInfo, FeedMode, Newsletter, PublicationInfo, UserInfo, UserPublications,
};
pub use obs::{
    emit_bulk_fetch_finished, emit_request_completed, emit_retry_scheduled,
    emit_unexpected_status, RequestSpan,
};
pub use publication::Publication;
pub use rate_limit::RateLimiter;
pub use telemetry::init_tracing;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
pub use user::User;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// `User-Agent` sent with every request
pub const USER_AGENT: &str = concat!("medium-api-rust-sdk/", env!("CARGO_PKG_VERSION"));
