//! Payload types returned by the Medium API.
//!
//! Every field tolerates being absent or `null`: the API omits fields for
//! deleted users, unlisted stories and the like, and a partially filled
//! struct is more useful to callers than a decode error.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MediumError;

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Profile of a Medium user (`/user/{user_id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInfo {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    #[serde(deserialize_with = "nullable")]
    pub fullname: String,
    #[serde(deserialize_with = "nullable")]
    pub bio: String,
    #[serde(deserialize_with = "nullable")]
    pub followers_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub following_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub publication_following_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(deserialize_with = "nullable")]
    pub bg_image_url: String,
    #[serde(deserialize_with = "nullable")]
    pub logo_image_url: String,
    #[serde(deserialize_with = "nullable")]
    pub twitter_username: String,
    #[serde(deserialize_with = "nullable")]
    pub tipping_link: String,
    #[serde(deserialize_with = "nullable")]
    pub medium_member_at: String,
    #[serde(deserialize_with = "nullable")]
    pub top_writer_in: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub is_writer_program_enrolled: bool,
    #[serde(deserialize_with = "nullable")]
    pub allow_notes: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_suspended: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_book_author: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_verified: bool,
    #[serde(deserialize_with = "nullable")]
    pub has_list: bool,
}

/// Metadata of a story (`/article/{article_id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleInfo {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub subtitle: String,
    /// Author's user id
    #[serde(deserialize_with = "nullable")]
    pub author: String,
    #[serde(deserialize_with = "nullable")]
    pub publication_id: String,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub claps: u64,
    #[serde(deserialize_with = "nullable")]
    pub voters: u64,
    #[serde(deserialize_with = "nullable")]
    pub word_count: u64,
    /// Minutes
    #[serde(deserialize_with = "nullable")]
    pub reading_time: f64,
    #[serde(deserialize_with = "nullable")]
    pub responses_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub published_at: String,
    #[serde(deserialize_with = "nullable")]
    pub last_modified_at: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub unique_slug: String,
    #[serde(deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(deserialize_with = "nullable")]
    pub lang: String,
    #[serde(deserialize_with = "nullable")]
    pub top_highlight: String,
    #[serde(deserialize_with = "nullable")]
    pub is_locked: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_series: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_shortform: bool,
}

/// Publication metadata (`/publication/{publication_id}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationInfo {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub tagline: String,
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    #[serde(deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(deserialize_with = "nullable")]
    pub followers: u64,
    #[serde(deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub twitter_username: String,
    #[serde(deserialize_with = "nullable")]
    pub instagram_username: String,
    #[serde(deserialize_with = "nullable")]
    pub facebook_pagename: String,
    /// Creator's user id
    #[serde(deserialize_with = "nullable")]
    pub creator: String,
    /// Editors' user ids
    #[serde(deserialize_with = "nullable")]
    pub editors: Vec<String>,
}

/// Publication newsletter (`/publication/{publication_id}/newsletter`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Newsletter {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub image: String,
    #[serde(deserialize_with = "nullable")]
    pub creator_id: String,
    #[serde(deserialize_with = "nullable")]
    pub subscribers: u64,
}

/// Publications a user administers or edits (`/user/{user_id}/publications`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPublications {
    #[serde(deserialize_with = "nullable")]
    pub admin_in: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub editor_in: Vec<String>,
}

/// Ranking used by `/topfeeds/{tag}/{mode}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Trending articles
    #[default]
    Hot,
    /// Latest articles
    New,
    /// Best of the year
    TopYear,
    /// Best of the month
    TopMonth,
    /// Best of the week
    TopWeek,
    /// Best of all time
    TopAllTime,
}

impl FeedMode {
    pub const ALL: [FeedMode; 6] = [
        FeedMode::Hot,
        FeedMode::New,
        FeedMode::TopYear,
        FeedMode::TopMonth,
        FeedMode::TopWeek,
        FeedMode::TopAllTime,
    ];

    /// Path segment used by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedMode::Hot => "hot",
            FeedMode::New => "new",
            FeedMode::TopYear => "top_year",
            FeedMode::TopMonth => "top_month",
            FeedMode::TopWeek => "top_week",
            FeedMode::TopAllTime => "top_all_time",
        }
    }
}

impl fmt::Display for FeedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedMode {
    type Err = MediumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeedMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| {
                MediumError::InvalidArgument(format!(
                    "unknown feed mode '{s}', expected one of: hot, new, top_year, top_month, top_week, top_all_time"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_tolerates_nulls_and_missing_fields() {
        let info: UserInfo = serde_json::from_value(json!({
            "id": "1985b61817c3",
            "username": "nishu-jain",
            "fullname": "Nishu Jain",
            "followers_count": 2400,
            "twitter_username": null,
            "top_writer_in": null,
            "is_writer_program_enrolled": true
        }))
        .unwrap();

        assert_eq!(info.fullname, "Nishu Jain");
        assert_eq!(info.followers_count, 2400);
        assert_eq!(info.twitter_username, "");
        assert!(info.top_writer_in.is_empty());
        assert!(info.is_writer_program_enrolled);
        assert!(!info.is_suspended);
    }

    #[test]
    fn test_article_info_decodes_reading_time_as_float() {
        let info: ArticleInfo = serde_json::from_value(json!({
            "id": "562c5821b5f0",
            "title": "About Me",
            "author": "1985b61817c3",
            "reading_time": 3.2,
            "tags": ["about-me", "writing"],
            "claps": 120
        }))
        .unwrap();

        assert_eq!(info.title, "About Me");
        assert!((info.reading_time - 3.2).abs() < f64::EPSILON);
        assert_eq!(info.tags.len(), 2);
        assert_eq!(info.publication_id, "");
    }

    #[test]
    fn test_feed_mode_parse_and_display() {
        for mode in FeedMode::ALL {
            assert_eq!(mode.as_str().parse::<FeedMode>().unwrap(), mode);
        }
        assert_eq!(FeedMode::TopAllTime.to_string(), "top_all_time");
        assert!("trending".parse::<FeedMode>().is_err());
    }

    #[test]
    fn test_feed_mode_serde_matches_path_segment() {
        let encoded = serde_json::to_string(&FeedMode::TopWeek).unwrap();
        assert_eq!(encoded, "\"top_week\"");
    }
}
