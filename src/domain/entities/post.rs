use super::user::Identity;
use crate::domain::value_objects::hashtags::extract_hashtags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub url: String,
    pub media_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub public: bool,
    pub tags: Vec<String>,
    pub mentions: Vec<String>,
    pub media: Option<MediaInfo>,
    pub likes_count: u32,
    pub retweets_count: u32,
    pub blocked: bool,
    pub is_retweet: bool,
    pub retweet_author_id: Option<String>,
    pub original_post_id: Option<String>,
}

impl Post {
    pub fn new(content: String, author_id: String) -> Self {
        let tags = extract_hashtags(&content);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content,
            author_id,
            created_at: Utc::now(),
            public: true,
            tags,
            mentions: Vec::new(),
            media: None,
            likes_count: 0,
            retweets_count: 0,
            blocked: false,
            is_retweet: false,
            retweet_author_id: None,
            original_post_id: None,
        }
    }

    pub fn with_visibility(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = mentions;
        self
    }

    pub fn with_media(mut self, media: Option<MediaInfo>) -> Self {
        self.media = media;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Builds the reshare row for `original`. The row keeps the original author,
    /// content and counters but gets its own id and timestamp.
    pub fn new_retweet(original: &Post, actor_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: original.content.clone(),
            author_id: original.author_id.clone(),
            created_at: Utc::now(),
            public: original.public,
            tags: original.tags.clone(),
            mentions: original.mentions.clone(),
            media: original.media.clone(),
            likes_count: original.likes_count,
            retweets_count: original.retweets_count,
            blocked: original.blocked,
            is_retweet: true,
            retweet_author_id: Some(actor_id.to_string()),
            original_post_id: Some(original.canonical_id().to_string()),
        }
    }

    /// Id that likes, retweets and blocks are recorded against.
    pub fn canonical_id(&self) -> &str {
        match (&self.is_retweet, &self.original_post_id) {
            (true, Some(original)) => original,
            _ => &self.id,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        if self.is_retweet {
            self.retweet_author_id.as_deref() == Some(user_id)
        } else {
            self.author_id == user_id
        }
    }

    /// Blocked posts stay reachable by id only for admins and the users
    /// behind the row.
    pub fn hidden_from(&self, viewer: &Identity) -> bool {
        self.blocked
            && !viewer.is_admin
            && self.author_id != viewer.user_id
            && self.retweet_author_id.as_deref() != Some(viewer.user_id.as_str())
    }

    pub fn set_content(&mut self, content: String) {
        self.tags = extract_hashtags(&content);
        self.content = content;
    }
}
