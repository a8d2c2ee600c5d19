use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::{contains_ignore_case, proxy_image_url};

/// An image attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub thumb: String,
    pub fullsize: String,
    #[serde(default)]
    pub alt: String,
}

impl PostImage {
    /// Thumbnail routed through the image proxy
    pub fn proxied_thumb(&self) -> String {
        proxy_image_url(&self.thumb)
    }

    /// Full-size image routed through the image proxy
    pub fn proxied_fullsize(&self) -> String {
        proxy_image_url(&self.fullsize)
    }

    pub fn alt_display(&self) -> &str {
        if self.alt.trim().is_empty() {
            "Post image"
        } else {
            &self.alt
        }
    }
}

/// A post as shown on the timeline. Read-only; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub uri: String,
    pub author_handle: String,
    pub author_display_name: Option<String>,
    pub text: String,
    pub created_at: Option<DateTime<Utc>>,
    pub indexed_at: DateTime<Utc>,
    #[serde(default)]
    pub images: Vec<PostImage>,
}

impl Post {
    /// Case-insensitive substring match on body text or author handle.
    /// An empty term matches everything.
    pub fn matches_search(&self, term: &str) -> bool {
        term.is_empty()
            || contains_ignore_case(&self.text, term)
            || contains_ignore_case(&self.author_handle, term)
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// Timestamp in the local time zone, e.g. "Mar 04, 2025 9:15 PM"
    pub fn formatted_time(&self) -> String {
        self.indexed_at
            .with_timezone(&Local)
            .format("%b %d, %Y %-I:%M %p")
            .to_string()
    }

    pub fn author_display(&self) -> String {
        format!("@{}", self.author_handle)
    }
}

// ============================================================================
// app.bsky.feed.getTimeline response shapes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    #[serde(default)]
    pub feed: Vec<FeedViewPost>,
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedViewPost {
    pub post: PostView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostView {
    pub uri: String,
    pub author: AuthorView,
    pub record: PostRecord,
    pub embed: Option<EmbedView>,
    #[serde(rename = "indexedAt")]
    pub indexed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorView {
    pub handle: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    /// Written by whichever client made the post, so it is not trusted to
    /// be RFC 3339. Anything unparseable becomes `None`.
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Only image embeds are rendered; other embed kinds deserialize with no images.
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedView {
    #[serde(default)]
    pub images: Vec<PostImage>,
}

impl FeedViewPost {
    pub fn to_post(&self) -> Post {
        let post = &self.post;
        Post {
            uri: post.uri.clone(),
            author_handle: post.author.handle.clone(),
            author_display_name: post.author.display_name.clone(),
            text: post.record.text.clone(),
            created_at: post.record.created_at,
            indexed_at: post.indexed_at,
            images: post
                .embed
                .as_ref()
                .map(|e| e.images.clone())
                .unwrap_or_default(),
        }
    }
}
