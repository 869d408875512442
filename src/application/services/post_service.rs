use super::follow_graph::collect_following_ids;
use super::interaction_service::InteractionService;
use super::post_decorator::{DecoratedPost, PostDecorator};
use crate::application::ports::cache::TrendingCache;
use crate::application::ports::event_publisher::{ContentEvent, EventPublisher};
use crate::application::ports::notifier::{Notification, Notifier};
use crate::application::ports::repositories::PostRepository;
use crate::application::ports::user_service::FollowGraph;
use crate::domain::entities::{Identity, MediaInfo, Post};
use crate::domain::value_objects::normalize_tags;
use crate::shared::config::FeedConfig;
use crate::shared::error::AppError;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const POST_CREATED_EVENT: &str = "post_created";

#[derive(Debug, Clone, Default)]
pub struct CreatePostInput {
    pub content: String,
    pub public: Option<bool>,
    pub mentions: Vec<String>,
    pub media: Option<MediaInfo>,
}

/// Partial edit. `None` leaves a field unchanged; `media: Some(None)` removes
/// the attachment.
#[derive(Debug, Clone, Default)]
pub struct EditPostInput {
    pub content: Option<String>,
    pub public: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub media: Option<Option<MediaInfo>>,
    pub mentions: Option<Vec<String>>,
}

impl EditPostInput {
    fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.public.is_none()
            && self.tags.is_none()
            && self.media.is_none()
            && self.mentions.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMetrics {
    pub post_id: String,
    pub likes_count: u32,
    pub retweets_count: u32,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    follow_graph: Arc<dyn FollowGraph>,
    notifier: Arc<dyn Notifier>,
    publisher: Arc<dyn EventPublisher>,
    interactions: Arc<InteractionService>,
    decorator: Arc<PostDecorator>,
    trending_cache: Arc<dyn TrendingCache>,
    config: FeedConfig,
}

impl PostService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        posts: Arc<dyn PostRepository>,
        follow_graph: Arc<dyn FollowGraph>,
        notifier: Arc<dyn Notifier>,
        publisher: Arc<dyn EventPublisher>,
        interactions: Arc<InteractionService>,
        decorator: Arc<PostDecorator>,
        trending_cache: Arc<dyn TrendingCache>,
        config: FeedConfig,
    ) -> Self {
        Self {
            posts,
            follow_graph,
            notifier,
            publisher,
            interactions,
            decorator,
            trending_cache,
            config,
        }
    }

    fn validate_content(&self, content: &str) -> Result<(), AppError> {
        if content.trim().is_empty() {
            return Err(AppError::validation("content is required"));
        }
        if content.chars().count() > self.config.max_content_chars {
            return Err(AppError::validation(format!(
                "content exceeds {} characters",
                self.config.max_content_chars
            )));
        }
        Ok(())
    }

    fn validate_media(media: Option<&MediaInfo>) -> Result<(), AppError> {
        if let Some(media) = media {
            if media.url.trim().is_empty() || media.media_type.trim().is_empty() {
                return Err(AppError::validation("media requires url and media_type"));
            }
        }
        Ok(())
    }

    pub async fn create_post(
        &self,
        identity: &Identity,
        input: CreatePostInput,
    ) -> Result<Post, AppError> {
        self.validate_content(&input.content)?;
        Self::validate_media(input.media.as_ref())?;

        let mentions = clean_mentions(input.mentions, &identity.user_id);
        let post = Post::new(input.content, identity.user_id.clone())
            .with_visibility(input.public.unwrap_or(true))
            .with_mentions(mentions)
            .with_media(input.media);
        self.posts.create_post(&post).await?;
        if !post.tags.is_empty() {
            self.trending_cache.invalidate().await;
        }
        tracing::info!(post_id = %post.id, user_id = %post.author_id, "post created");

        for recipient in &post.mentions {
            self.notifier
                .notify(&Notification::mention(recipient, &post.author_id, &post.id))
                .await?;
        }

        let event = ContentEvent::new(POST_CREATED_EVENT, serde_json::to_value(&post)?);
        if let Err(err) = self.publisher.publish(&event).await {
            tracing::warn!(post_id = %post.id, error = %err, "failed to publish content event");
            return Err(err);
        }

        Ok(post)
    }

    /// Fetches a post for `identity`. Blocked posts are only returned to their
    /// author or an admin; private posts to their author, an admin, or a
    /// follower of the author.
    pub async fn get_post(
        &self,
        identity: &Identity,
        post_id: &str,
    ) -> Result<DecoratedPost, AppError> {
        let post = self.load_readable(identity, post_id).await?;
        self.decorator.decorate_one(&identity.user_id, post).await
    }

    async fn load_readable(&self, identity: &Identity, post_id: &str) -> Result<Post, AppError> {
        let not_found = || AppError::not_found(format!("post {post_id} not found"));
        let post = self.posts.get_post(post_id).await?.ok_or_else(not_found)?;
        if post.hidden_from(identity) {
            return Err(not_found());
        }
        if post.public
            || identity.is_admin
            || post.author_id == identity.user_id
            || post.retweet_author_id.as_deref() == Some(identity.user_id.as_str())
        {
            return Ok(post);
        }

        let following = collect_following_ids(self.follow_graph.as_ref(), &identity.user_id).await?;
        let follows_author = following.contains(&post.author_id)
            || post
                .retweet_author_id
                .as_ref()
                .is_some_and(|id| following.contains(id));
        if follows_author {
            Ok(post)
        } else {
            Err(not_found())
        }
    }

    pub async fn edit_post(
        &self,
        identity: &Identity,
        post_id: &str,
        input: EditPostInput,
    ) -> Result<Post, AppError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} not found")))?;
        if post.is_retweet {
            return Err(AppError::validation("retweets cannot be edited"));
        }
        if post.author_id != identity.user_id && !identity.is_admin {
            return Err(AppError::forbidden("only the author can edit this post"));
        }
        if let Some(content) = input.content.as_deref() {
            self.validate_content(content)?;
        }
        if let Some(media) = &input.media {
            Self::validate_media(media.as_ref())?;
        }
        if input.is_empty() {
            return Ok(post);
        }

        let retagged = input.content.is_some() || input.tags.is_some();
        let mut updated = post.clone();
        if let Some(content) = input.content {
            updated.set_content(content);
            self.posts.set_content(&post.id, &updated.content).await?;
            self.posts.set_tags(&post.id, &updated.tags).await?;
        }
        if let Some(tags) = input.tags {
            self.posts.set_tags(&post.id, &normalize_tags(tags)).await?;
        }
        if let Some(public) = input.public {
            self.posts.set_public(&post.id, public).await?;
        }
        if let Some(media) = input.media {
            self.posts.set_media(&post.id, media.as_ref()).await?;
        }
        if let Some(mentions) = input.mentions {
            let mentions = clean_mentions(mentions, &post.author_id);
            self.posts.set_mentions(&post.id, &mentions).await?;
        }
        if retagged {
            self.trending_cache.invalidate().await;
        }
        tracing::info!(post_id = %post.id, user_id = %identity.user_id, "post edited");

        self.posts
            .get_post(&post.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} not found")))
    }

    /// Deletes an original with everything hanging off it. Deleting a
    /// retweet row undoes that retweet.
    pub async fn delete_post(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} not found")))?;
        if !post.is_owned_by(&identity.user_id) && !identity.is_admin {
            return Err(AppError::forbidden("only the author can delete this post"));
        }

        if post.is_retweet {
            let retweeter = post.retweet_author_id.as_deref().unwrap_or_default();
            self.interactions
                .undo_retweet(post.canonical_id(), retweeter)
                .await?;
            // A retweet row without a relation entry is removed directly.
            match self.posts.delete_post(&post.id).await {
                Ok(()) | Err(AppError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        } else {
            self.posts.delete_post(&post.id).await?;
            self.trending_cache.invalidate().await;
        }

        tracing::info!(post_id = %post.id, user_id = %identity.user_id, "post deleted");
        Ok(())
    }

    pub async fn post_metrics(
        &self,
        identity: &Identity,
        post_id: &str,
    ) -> Result<PostMetrics, AppError> {
        let post = self.load_readable(identity, post_id).await?;
        Ok(PostMetrics {
            post_id: post.canonical_id().to_string(),
            likes_count: post.likes_count,
            retweets_count: post.retweets_count,
        })
    }
}

/// De-duplicates mentions and drops blanks and self-mentions.
fn clean_mentions(mentions: Vec<String>, author_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    mentions
        .iter()
        .map(|mention| mention.trim().trim_start_matches('@').to_string())
        .filter(|mention| !mention.is_empty() && mention != author_id)
        .filter(|mention| seen.insert(mention.clone()))
        .collect()
}
