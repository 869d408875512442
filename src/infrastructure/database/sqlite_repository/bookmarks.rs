use super::SqliteRepository;
use super::mapper::map_post_rows;
use super::queries::{DELETE_BOOKMARK, INSERT_BOOKMARK, SELECT_BOOKMARKED_POSTS};
use crate::application::ports::repositories::BookmarkRepository;
use crate::domain::entities::Post;
use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl BookmarkRepository for SqliteRepository {
    async fn add_bookmark(&self, user_id: &str, post_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(INSERT_BOOKMARK)
            .bind(user_id)
            .bind(post_id)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_bookmark(&self, user_id: &str, post_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(DELETE_BOOKMARK)
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_bookmarked_posts(
        &self,
        user_id: &str,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError> {
        let rows = sqlx::query(SELECT_BOOKMARKED_POSTS)
            .bind(user_id)
            .bind(i64::from(page.fetch_limit()))
            .bind(i64::from(page.skip))
            .fetch_all(self.pool.get_pool())
            .await?;
        map_post_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_repository;
    use super::*;
    use crate::application::ports::repositories::PostRepository;

    #[tokio::test]
    async fn bookmark_flow_roundtrip() {
        let repo = memory_repository().await;
        let first = Post::new("first".into(), "alice".into());
        let second = Post::new("second".into(), "alice".into());
        repo.create_post(&first).await.unwrap();
        repo.create_post(&second).await.unwrap();

        assert!(repo.add_bookmark("carol", &first.id).await.unwrap());
        assert!(repo.add_bookmark("carol", &second.id).await.unwrap());
        assert!(!repo.add_bookmark("carol", &second.id).await.unwrap());

        let page = PageRequest { skip: 0, limit: 10 };
        let listed = repo.list_bookmarked_posts("carol", page).await.unwrap();
        let ids: Vec<_> = listed.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        assert!(repo.remove_bookmark("carol", &second.id).await.unwrap());
        assert!(!repo.remove_bookmark("carol", &second.id).await.unwrap());
        let listed = repo.list_bookmarked_posts("carol", page).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn blocked_posts_are_hidden_from_bookmarks() {
        let repo = memory_repository().await;
        let post = Post::new("x".into(), "alice".into());
        repo.create_post(&post).await.unwrap();
        repo.add_bookmark("carol", &post.id).await.unwrap();
        repo.set_blocked(&post.id, true).await.unwrap();

        let listed = repo
            .list_bookmarked_posts("carol", PageRequest { skip: 0, limit: 10 })
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
