use super::follow_graph::collect_following_ids;
use super::post_decorator::{DecoratedPost, PostDecorator};
use crate::application::ports::repositories::{BookmarkRepository, PostRepository};
use crate::application::ports::user_service::{FollowGraph, UserDirectory};
use crate::domain::entities::Identity;
use crate::domain::post_filter::{Authorship, PostFilter, TagPredicate};
use crate::domain::value_objects::{FeedKind, Page, PageRequest, normalize_tags};
use crate::shared::config::FeedConfig;
use crate::shared::error::AppError;
use crate::shared::metrics;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct FeedRequest {
    pub kind: FeedKind,
    pub target_user_id: Option<String>,
    pub from_time: DateTime<Utc>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// Builds the predicate for one feed kind.
pub fn feed_filter(
    kind: FeedKind,
    cursor: DateTime<Utc>,
    following_ids: Vec<String>,
    target_user_id: Option<&str>,
    interest_tags: Vec<String>,
) -> Result<PostFilter, AppError> {
    let base = PostFilter::before(cursor);
    let filter = match kind {
        FeedKind::Following => base.authored_by(Authorship::FollowedBy(following_ids)),
        FeedKind::ForYou => base
            .authored_by(Authorship::FollowedBy(following_ids.clone()))
            .tagged(TagPredicate::AnyOf(interest_tags))
            .visible_via(following_ids),
        FeedKind::Single => base
            .authored_by(Authorship::Profile(require_target(target_user_id)?))
            .visible_via(following_ids),
        FeedKind::Retweet => base
            .authored_by(Authorship::RetweetsInvolving(require_target(target_user_id)?))
            .visible_via(following_ids),
        FeedKind::All => base,
    };
    Ok(filter)
}

fn require_target(target_user_id: Option<&str>) -> Result<String, AppError> {
    target_user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("wanted_user_id is required for this feed type"))
}

pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
    follow_graph: Arc<dyn FollowGraph>,
    user_directory: Arc<dyn UserDirectory>,
    decorator: Arc<PostDecorator>,
    config: FeedConfig,
}

impl FeedService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        follow_graph: Arc<dyn FollowGraph>,
        user_directory: Arc<dyn UserDirectory>,
        decorator: Arc<PostDecorator>,
        config: FeedConfig,
    ) -> Self {
        Self {
            posts,
            bookmarks,
            follow_graph,
            user_directory,
            decorator,
            config,
        }
    }

    pub async fn get_feed(
        &self,
        identity: &Identity,
        request: FeedRequest,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let kind = request.kind;
        if kind == FeedKind::All && !identity.is_admin {
            return Err(AppError::forbidden("the all feed is restricted to admins"));
        }
        if kind.requires_target() {
            require_target(request.target_user_id.as_deref())?;
        }

        let interest_tags = if kind == FeedKind::ForYou {
            let tags = normalize_tags(self.user_directory.interest_tags(&identity.user_id).await?);
            if tags.is_empty() {
                return Err(AppError::validation("no tags found"));
            }
            tags
        } else {
            Vec::new()
        };

        let following_ids = if kind == FeedKind::All {
            Vec::new()
        } else {
            collect_following_ids(self.follow_graph.as_ref(), &identity.user_id).await?
        };

        let filter = feed_filter(
            kind,
            request.from_time,
            following_ids,
            request.target_user_id.as_deref(),
            interest_tags,
        )?;
        let page = PageRequest::new(request.skip, request.limit, &self.config);
        let rows = self.posts.find_posts(&filter, page).await?;
        let page = self
            .decorator
            .decorate_page(&identity.user_id, page.paginate(rows))
            .await?;

        metrics::inc_feed_page(kind.as_str());
        tracing::debug!(
            user_id = %identity.user_id,
            kind = %kind,
            returned = page.items.len(),
            next_offset = ?page.next_offset,
            "feed page assembled"
        );
        Ok(page)
    }

    /// The caller's bookmarks, most recently bookmarked first.
    pub async fn list_bookmarks(
        &self,
        identity: &Identity,
        skip: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Page<DecoratedPost>, AppError> {
        let page = PageRequest::new(skip, limit, &self.config);
        let rows = self
            .bookmarks
            .list_bookmarked_posts(&identity.user_id, page)
            .await?;
        self.decorator
            .decorate_page(&identity.user_id, page.paginate(rows))
            .await
    }
}
