use super::{deserialize_some, Validate};
use crate::application::services::{CreatePostInput, DecoratedPost, EditPostInput};
use crate::domain::entities::{AuthorInfo, MediaInfo, Post};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDto {
    pub url: String,
    pub media_type: String,
}

impl From<MediaInfo> for MediaDto {
    fn from(media: MediaInfo) -> Self {
        Self {
            url: media.url,
            media_type: media.media_type,
        }
    }
}

impl From<MediaDto> for MediaInfo {
    fn from(media: MediaDto) -> Self {
        Self {
            url: media.url,
            media_type: media.media_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDto {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub photo_url: Option<String>,
}

impl From<AuthorInfo> for AuthorDto {
    fn from(author: AuthorInfo) -> Self {
        Self {
            id: author.id,
            username: author.username,
            display_name: author.display_name,
            photo_url: author.photo_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: String,
    pub content: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub public: bool,
    pub tags: Vec<String>,
    pub mentions: Vec<String>,
    pub media: Option<MediaDto>,
    pub likes_count: u32,
    pub retweets_count: u32,
    pub blocked: bool,
    pub is_retweet: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet_author_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_post_id: Option<String>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
            public: post.public,
            tags: post.tags,
            mentions: post.mentions,
            media: post.media.map(MediaDto::from),
            likes_count: post.likes_count,
            retweets_count: post.retweets_count,
            blocked: post.blocked,
            is_retweet: post.is_retweet,
            retweet_author_id: post.retweet_author_id,
            original_post_id: post.original_post_id,
        }
    }
}

/// A post as rendered in feeds: the row plus author display info and the
/// asker's own like/retweet state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItemDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub author: AuthorDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retweet_author: Option<AuthorDto>,
    pub liked: bool,
    pub retweeted: bool,
}

impl From<DecoratedPost> for FeedItemDto {
    fn from(item: DecoratedPost) -> Self {
        Self {
            post: item.post.into(),
            author: item.author.into(),
            retweet_author: item.retweet_author.map(AuthorDto::from),
            liked: item.liked,
            retweeted: item.retweeted,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub mentions: Vec<String>,
    #[serde(default)]
    pub media: Option<MediaDto>,
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), String> {
        if self.content.trim().is_empty() {
            return Err("content is required".to_string());
        }
        Ok(())
    }
}

impl From<CreatePostRequest> for CreatePostInput {
    fn from(request: CreatePostRequest) -> Self {
        Self {
            content: request.content,
            public: request.public,
            mentions: request.mentions,
            media: request.media.map(MediaInfo::from),
        }
    }
}

/// Partial update. Absent fields are left unchanged; `"media": null` removes
/// the attachment.
#[derive(Debug, Default, Deserialize)]
pub struct EditPostRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub media: Option<Option<MediaDto>>,
    #[serde(default)]
    pub mentions: Option<Vec<String>>,
}

impl Validate for EditPostRequest {
    fn validate(&self) -> Result<(), String> {
        if self.content.is_none()
            && self.public.is_none()
            && self.tags.is_none()
            && self.media.is_none()
            && self.mentions.is_none()
        {
            return Err("no fields to update".to_string());
        }
        Ok(())
    }
}

impl From<EditPostRequest> for EditPostInput {
    fn from(request: EditPostRequest) -> Self {
        Self {
            content: request.content,
            public: request.public,
            tags: request.tags,
            media: request.media.map(|media| media.map(MediaInfo::from)),
            mentions: request.mentions,
        }
    }
}
