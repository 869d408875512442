use crate::application::ports::cache::TrendingCache;
use crate::application::ports::repositories::{
    BookmarkRepository, InteractionRepository, PostRepository,
};
use crate::domain::entities::{Identity, Post};
use crate::shared::error::AppError;
use crate::shared::metrics;
use std::sync::Arc;

/// Like, retweet, bookmark and block mutators.
///
/// Duplicate actions are rejected by a membership check before any write. The
/// relation insert itself is conditional, so a concurrent duplicate that
/// slips past the check is still refused without touching the counters.
pub struct InteractionService {
    posts: Arc<dyn PostRepository>,
    interactions: Arc<dyn InteractionRepository>,
    bookmarks: Arc<dyn BookmarkRepository>,
    trending_cache: Arc<dyn TrendingCache>,
}

impl InteractionService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        interactions: Arc<dyn InteractionRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        trending_cache: Arc<dyn TrendingCache>,
    ) -> Self {
        Self {
            posts,
            interactions,
            bookmarks,
            trending_cache,
        }
    }

    async fn load_target(&self, identity: &Identity, post_id: &str) -> Result<Post, AppError> {
        match self.posts.get_post(post_id).await? {
            Some(post) if !post.hidden_from(identity) => Ok(post),
            _ => Err(AppError::not_found(format!("post {post_id} not found"))),
        }
    }

    pub async fn like(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let post = self.load_target(identity, post_id).await?;
        let canonical_id = post.canonical_id();
        let user_id = identity.user_id.as_str();

        if self.interactions.has_liked(canonical_id, user_id).await? {
            return Err(AppError::conflict("already liked"));
        }
        if !self.interactions.add_like(canonical_id, user_id).await? {
            return Err(AppError::conflict("already liked"));
        }
        self.posts.increment_likes(canonical_id, 1).await?;

        metrics::inc_interaction("like");
        tracing::info!(post_id = %canonical_id, user_id = %user_id, "post liked");
        Ok(())
    }

    /// Missing likes are ignored.
    pub async fn unlike(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let post = self.load_target(identity, post_id).await?;
        let canonical_id = post.canonical_id();
        let user_id = identity.user_id.as_str();

        if self.interactions.remove_like(canonical_id, user_id).await? {
            self.posts.increment_likes(canonical_id, -1).await?;
            metrics::inc_interaction("unlike");
            tracing::info!(post_id = %canonical_id, user_id = %user_id, "post unliked");
        }
        Ok(())
    }

    /// Creates a reshare row for the actor and returns it.
    pub async fn retweet(&self, identity: &Identity, post_id: &str) -> Result<Post, AppError> {
        let target = self.load_target(identity, post_id).await?;
        let user_id = identity.user_id.as_str();
        let canonical_id = target.canonical_id().to_string();

        if self.interactions.has_retweeted(&canonical_id, user_id).await? {
            return Err(AppError::conflict("already retweeted"));
        }
        let original = if target.is_retweet {
            self.posts
                .get_post(&canonical_id)
                .await?
                .ok_or_else(|| AppError::not_found("original post not found"))?
        } else {
            target
        };

        let retweet = Post::new_retweet(&original, user_id);
        if !self.interactions.add_retweet(&retweet).await? {
            return Err(AppError::conflict("already retweeted"));
        }

        metrics::inc_interaction("retweet");
        tracing::info!(
            post_id = %canonical_id,
            retweet_id = %retweet.id,
            user_id = %user_id,
            "post retweeted"
        );

        self.posts
            .get_post(&retweet.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {} not found", retweet.id)))
    }

    /// Removes the actor's reshare of the post, if any.
    pub async fn unretweet(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let post = self.load_target(identity, post_id).await?;
        self.undo_retweet(post.canonical_id(), &identity.user_id)
            .await
    }

    /// Drops the relation entry, the reshare row, and one retweet from the
    /// counters. Nothing happens when the user has no reshare of the post.
    pub(crate) async fn undo_retweet(
        &self,
        canonical_id: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let Some(retweet_id) = self
            .interactions
            .remove_retweet(canonical_id, user_id)
            .await?
        else {
            return Ok(());
        };

        match self.posts.delete_post(&retweet_id).await {
            Ok(()) | Err(AppError::NotFound(_)) => {}
            Err(err) => return Err(err),
        }
        self.posts.increment_retweets(canonical_id, -1).await?;

        metrics::inc_interaction("unretweet");
        tracing::info!(
            post_id = %canonical_id,
            retweet_id = %retweet_id,
            user_id = %user_id,
            "retweet removed"
        );
        Ok(())
    }

    pub async fn bookmark(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let post = self.load_target(identity, post_id).await?;
        if !self
            .bookmarks
            .add_bookmark(&identity.user_id, &post.id)
            .await?
        {
            return Err(AppError::conflict("already bookmarked"));
        }
        metrics::inc_interaction("bookmark");
        tracing::info!(post_id = %post.id, user_id = %identity.user_id, "post bookmarked");
        Ok(())
    }

    pub async fn unbookmark(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        if self
            .bookmarks
            .remove_bookmark(&identity.user_id, post_id)
            .await?
        {
            metrics::inc_interaction("unbookmark");
        }
        Ok(())
    }

    pub async fn block(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let original = self.load_moderation_target(identity, post_id).await?;
        if original.blocked {
            return Err(AppError::conflict("already blocked"));
        }
        self.posts.set_blocked(&original.id, true).await?;
        self.trending_cache.invalidate().await;

        metrics::inc_interaction("block");
        tracing::info!(post_id = %original.id, admin_id = %identity.user_id, "post blocked");
        Ok(())
    }

    pub async fn unblock(&self, identity: &Identity, post_id: &str) -> Result<(), AppError> {
        let original = self.load_moderation_target(identity, post_id).await?;
        if !original.blocked {
            return Ok(());
        }
        self.posts.set_blocked(&original.id, false).await?;
        self.trending_cache.invalidate().await;

        metrics::inc_interaction("unblock");
        tracing::info!(post_id = %original.id, admin_id = %identity.user_id, "post unblocked");
        Ok(())
    }

    async fn load_moderation_target(
        &self,
        identity: &Identity,
        post_id: &str,
    ) -> Result<Post, AppError> {
        if !identity.is_admin {
            return Err(AppError::forbidden("blocking posts requires admin access"));
        }
        let post = self
            .posts
            .get_post(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {post_id} not found")))?;
        if !post.is_retweet {
            return Ok(post);
        }
        let canonical_id = post.canonical_id().to_string();
        self.posts
            .get_post(&canonical_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("post {canonical_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{MockCache, noop_cache, repository};
    use crate::infrastructure::database::SqliteRepository;

    fn service_with_cache(repo: Arc<SqliteRepository>, cache: MockCache) -> InteractionService {
        InteractionService::new(repo.clone(), repo.clone(), repo, Arc::new(cache))
    }

    fn service(repo: Arc<SqliteRepository>) -> InteractionService {
        service_with_cache(repo, noop_cache())
    }

    async fn stored_post(repo: &SqliteRepository) -> Post {
        let post = Post::new("#a hello".into(), "alice".into());
        repo.create_post(&post).await.unwrap();
        post
    }

    async fn reload(repo: &SqliteRepository, id: &str) -> Post {
        repo.get_post(id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn double_like_is_a_conflict_and_counts_once() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let service = service(repo.clone());
        let carol = Identity::new("carol", false);

        service.like(&carol, &post.id).await.unwrap();
        let err = service.like(&carol, &post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(reload(&repo, &post.id).await.likes_count, 1);

        service.unlike(&carol, &post.id).await.unwrap();
        service.unlike(&carol, &post.id).await.unwrap();
        assert_eq!(reload(&repo, &post.id).await.likes_count, 0);
    }

    #[tokio::test]
    async fn concurrent_duplicate_likes_count_once() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let service = Arc::new(service(repo.clone()));
        let carol = Identity::new("carol", false);

        let attempts = (0..8).map(|_| {
            let service = Arc::clone(&service);
            let carol = carol.clone();
            let id = post.id.clone();
            tokio::spawn(async move { service.like(&carol, &id).await })
        });
        let results = futures::future::join_all(attempts).await;
        let succeeded = results
            .into_iter()
            .map(|joined| joined.unwrap())
            .filter(|result| result.is_ok())
            .count();

        assert_eq!(succeeded, 1);
        assert_eq!(reload(&repo, &post.id).await.likes_count, 1);
    }

    #[tokio::test]
    async fn like_through_a_retweet_row_counts_against_the_original() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let service = service(repo.clone());

        let reshare = service
            .retweet(&Identity::new("bob", false), &post.id)
            .await
            .unwrap();
        service
            .like(&Identity::new("carol", false), &reshare.id)
            .await
            .unwrap();

        assert_eq!(reload(&repo, &post.id).await.likes_count, 1);
        assert_eq!(reload(&repo, &reshare.id).await.likes_count, 1);
    }

    #[tokio::test]
    async fn retweet_then_unretweet_restores_counters() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let service = service(repo.clone());
        let bob = Identity::new("bob", false);

        let reshare = service.retweet(&bob, &post.id).await.unwrap();
        assert!(reshare.is_retweet);
        assert_eq!(reshare.retweet_author_id.as_deref(), Some("bob"));
        assert_eq!(reshare.original_post_id.as_deref(), Some(post.id.as_str()));
        assert_eq!(reshare.retweets_count, 1);
        assert_eq!(reload(&repo, &post.id).await.retweets_count, 1);

        let err = service.retweet(&bob, &post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        service.unretweet(&bob, &post.id).await.unwrap();
        assert_eq!(reload(&repo, &post.id).await.retweets_count, 0);
        assert!(!repo.has_retweeted(&post.id, "bob").await.unwrap());
        assert!(repo.get_post(&reshare.id).await.unwrap().is_none());

        service.unretweet(&bob, &post.id).await.unwrap();
        assert_eq!(reload(&repo, &post.id).await.retweets_count, 0);
    }

    #[tokio::test]
    async fn retweet_of_missing_post_is_not_found() {
        let repo = repository().await;
        let service = service(repo);
        let err = service
            .retweet(&Identity::new("bob", false), "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn bookmark_twice_is_a_conflict_and_unbookmark_is_tolerant() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let service = service(repo);
        let carol = Identity::new("carol", false);

        service.bookmark(&carol, &post.id).await.unwrap();
        let err = service.bookmark(&carol, &post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        service.unbookmark(&carol, &post.id).await.unwrap();
        service.unbookmark(&carol, &post.id).await.unwrap();
    }

    #[tokio::test]
    async fn block_is_admin_only_and_covers_retweet_rows() {
        let repo = repository().await;
        let post = stored_post(&repo).await;
        let mut cache = MockCache::new();
        cache.expect_invalidate().times(2).returning(|| ());
        let service = service_with_cache(repo.clone(), cache);
        let reshare = service
            .retweet(&Identity::new("bob", false), &post.id)
            .await
            .unwrap();

        let err = service
            .block(&Identity::new("carol", false), &post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let admin = Identity::new("root", true);
        service.block(&admin, &reshare.id).await.unwrap();
        assert!(reload(&repo, &post.id).await.blocked);
        assert!(reload(&repo, &reshare.id).await.blocked);

        let err = service.block(&admin, &post.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let err = service
            .like(&Identity::new("carol", false), &post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        service.unblock(&admin, &post.id).await.unwrap();
        service.unblock(&admin, &post.id).await.unwrap();
        assert!(!reload(&repo, &post.id).await.blocked);
    }
}
