use super::SqliteRepository;
use super::filter::build_post_query;
use super::mapper::{map_post_row, map_post_rows, serialize_media, serialize_string_list};
use super::queries::{
    DELETE_BOOKMARKS_FOR_POST_FAMILY, DELETE_LIKES_FOR_POST, DELETE_POST_FAMILY,
    DELETE_RETWEETS_FOR_POST, INCREMENT_LIKES, INCREMENT_RETWEETS, INSERT_POST, SELECT_POST_BY_ID,
    UPDATE_POST_BLOCKED, UPDATE_POST_CONTENT, UPDATE_POST_MEDIA, UPDATE_POST_MENTIONS,
    UPDATE_POST_PUBLIC, UPDATE_POST_TAGS,
};
use crate::application::ports::repositories::PostRepository;
use crate::domain::entities::{MediaInfo, Post};
use crate::domain::post_filter::PostFilter;
use crate::domain::value_objects::PageRequest;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, query::Query};

fn require_updated(rows_affected: u64, post_id: &str) -> Result<(), AppError> {
    if rows_affected == 0 {
        return Err(AppError::not_found(format!("post {post_id} not found")));
    }
    Ok(())
}

/// Binds every column of `post` to [`INSERT_POST`].
pub(super) fn insert_post_query(
    post: &Post,
) -> Result<Query<'_, Sqlite, SqliteArguments<'_>>, AppError> {
    let created_at = post.created_at.timestamp_millis();
    Ok(sqlx::query(INSERT_POST)
        .bind(&post.id)
        .bind(&post.content)
        .bind(&post.author_id)
        .bind(created_at)
        .bind(created_at)
        .bind(post.public)
        .bind(serialize_string_list(&post.tags)?)
        .bind(serialize_string_list(&post.mentions)?)
        .bind(serialize_media(post.media.as_ref())?)
        .bind(i64::from(post.likes_count))
        .bind(i64::from(post.retweets_count))
        .bind(post.blocked)
        .bind(post.is_retweet)
        .bind(post.retweet_author_id.as_deref())
        .bind(post.original_post_id.as_deref()))
}

impl SqliteRepository {
    async fn execute_post_update<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
        post_id: &str,
    ) -> Result<(), AppError> {
        let result = query.execute(self.pool.get_pool()).await?;
        require_updated(result.rows_affected(), post_id)
    }
}

#[async_trait]
impl PostRepository for SqliteRepository {
    async fn create_post(&self, post: &Post) -> Result<(), AppError> {
        insert_post_query(post)?
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, AppError> {
        let row = sqlx::query(SELECT_POST_BY_ID)
            .bind(id)
            .fetch_optional(self.pool.get_pool())
            .await?;

        match row {
            Some(row) => Ok(Some(map_post_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_posts(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, AppError> {
        let mut builder = build_post_query(filter, page);
        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;
        map_post_rows(rows)
    }

    async fn increment_likes(&self, post_id: &str, delta: i64) -> Result<(), AppError> {
        let query = sqlx::query(INCREMENT_LIKES)
            .bind(post_id)
            .bind(delta)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn increment_retweets(&self, post_id: &str, delta: i64) -> Result<(), AppError> {
        let query = sqlx::query(INCREMENT_RETWEETS)
            .bind(post_id)
            .bind(delta)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_tags(&self, post_id: &str, tags: &[String]) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_TAGS)
            .bind(post_id)
            .bind(serialize_string_list(tags)?)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_content(&self, post_id: &str, content: &str) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_CONTENT)
            .bind(post_id)
            .bind(content)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_public(&self, post_id: &str, public: bool) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_PUBLIC)
            .bind(post_id)
            .bind(public)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_media(&self, post_id: &str, media: Option<&MediaInfo>) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_MEDIA)
            .bind(post_id)
            .bind(serialize_media(media)?)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_mentions(&self, post_id: &str, mentions: &[String]) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_MENTIONS)
            .bind(post_id)
            .bind(serialize_string_list(mentions)?)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn set_blocked(&self, post_id: &str, blocked: bool) -> Result<(), AppError> {
        let query = sqlx::query(UPDATE_POST_BLOCKED)
            .bind(post_id)
            .bind(blocked)
            .bind(Utc::now().timestamp_millis());
        self.execute_post_update(query, post_id).await
    }

    async fn delete_post(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.get_pool().begin().await?;

        sqlx::query(DELETE_BOOKMARKS_FOR_POST_FAMILY)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_LIKES_FOR_POST)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(DELETE_RETWEETS_FOR_POST)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query(DELETE_POST_FAMILY)
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(format!("post {id} not found")));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_repository;
    use super::*;
    use crate::application::ports::repositories::{BookmarkRepository, InteractionRepository};
    use crate::domain::post_filter::{Authorship, TagPredicate};
    use chrono::Duration;

    fn post_at(author: &str, content: &str, minutes_ago: i64) -> Post {
        Post::new(content.to_string(), author.to_string())
            .with_created_at(Utc::now() - Duration::minutes(minutes_ago))
    }

    fn page(skip: u32, limit: u32) -> PageRequest {
        PageRequest { skip, limit }
    }

    #[tokio::test]
    async fn create_and_get_roundtrip_keeps_all_fields() {
        let repo = memory_repository().await;
        let post = post_at("alice", "hello #Rust", 1)
            .with_visibility(false)
            .with_mentions(vec!["bob".into()])
            .with_media(Some(MediaInfo {
                url: "https://cdn.example/a.png".into(),
                media_type: "image/png".into(),
            }));
        repo.create_post(&post).await.unwrap();

        let stored = repo.get_post(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "hello #Rust");
        assert_eq!(stored.tags, vec!["rust".to_string()]);
        assert_eq!(stored.mentions, vec!["bob".to_string()]);
        assert!(!stored.public);
        assert_eq!(stored.media, post.media);
        assert_eq!(
            stored.created_at.timestamp_millis(),
            post.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn get_missing_post_is_none() {
        let repo = memory_repository().await;
        assert!(repo.get_post("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_posts_orders_newest_first_and_over_fetches() {
        let repo = memory_repository().await;
        let oldest = post_at("alice", "one", 3);
        let middle = post_at("alice", "two", 2);
        let newest = post_at("alice", "three", 1);
        for post in [&oldest, &middle, &newest] {
            repo.create_post(post).await.unwrap();
        }

        let rows = repo
            .find_posts(&PostFilter::before(Utc::now()), page(0, 2))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids, vec![newest.id.clone(), middle.id.clone(), oldest.id.clone()]);

        let rows = repo
            .find_posts(&PostFilter::before(Utc::now()), page(2, 2))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, oldest.id);
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let repo = memory_repository().await;
        let at = Utc::now() - Duration::minutes(1);
        let first = Post::new("first".into(), "alice".into()).with_created_at(at);
        let second = Post::new("second".into(), "alice".into()).with_created_at(at);
        repo.create_post(&first).await.unwrap();
        repo.create_post(&second).await.unwrap();

        let rows = repo
            .find_posts(&PostFilter::before(Utc::now()), page(0, 10))
            .await
            .unwrap();
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].id, first.id);
    }

    #[tokio::test]
    async fn blocked_rows_are_never_returned() {
        let repo = memory_repository().await;
        let post = post_at("alice", "spam", 1);
        repo.create_post(&post).await.unwrap();
        repo.set_blocked(&post.id, true).await.unwrap();

        let rows = repo
            .find_posts(&PostFilter::before(Utc::now()), page(0, 10))
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert!(repo.get_post(&post.id).await.unwrap().unwrap().blocked);
    }

    #[tokio::test]
    async fn sql_translation_agrees_with_in_memory_filter() {
        let repo = memory_repository().await;
        let a = post_at("alice", "#a #b rust", 5);
        let b = post_at("bob", "#a #c Tokio", 4).with_visibility(false);
        let c = post_at("carol", "#b plain", 3);
        let retweet = Post::new_retweet(&a, "carol");
        let all = vec![a.clone(), b.clone(), c.clone(), retweet.clone()];
        for post in &all {
            repo.create_post(post).await.unwrap();
        }

        let now = Utc::now();
        let filters = vec![
            PostFilter::before(now).authored_by(Authorship::FollowedBy(vec!["carol".into()])),
            PostFilter::before(now)
                .tagged(TagPredicate::AnyOf(vec!["c".into()]))
                .visible_via(vec![]),
            PostFilter::before(now)
                .tagged(TagPredicate::AnyOf(vec!["c".into()]))
                .visible_via(vec!["bob".into()]),
            PostFilter::before(now).tagged(TagPredicate::AllOf(vec!["a".into(), "b".into()])),
            PostFilter::before(now).authored_by(Authorship::Profile("alice".into())),
            PostFilter::before(now).authored_by(Authorship::RetweetsInvolving("alice".into())),
            PostFilter::before(now).containing_any(vec!["tokio".into(), "RUST".into()]),
        ];

        for filter in filters {
            let mut expected: Vec<String> = all
                .iter()
                .filter(|post| filter.matches(post))
                .map(|post| post.id.clone())
                .collect();
            let mut actual: Vec<String> = repo
                .find_posts(&filter, page(0, 30))
                .await
                .unwrap()
                .into_iter()
                .map(|post| post.id)
                .collect();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "filter {filter:?}");
        }
    }

    #[tokio::test]
    async fn following_feed_handles_very_large_followee_lists() {
        let repo = memory_repository().await;
        let followed = post_at("user-11999", "deep in the list", 2);
        let reshare = Post::new_retweet(&post_at("stranger", "shared", 3), "user-42");
        let ignored = post_at("stranger", "not followed", 1);
        for post in [&followed, &reshare, &ignored] {
            repo.create_post(post).await.unwrap();
        }

        let ids: Vec<String> = (0..12_000).map(|n| format!("user-{n}")).collect();
        let filter = PostFilter::before(Utc::now() + Duration::minutes(1))
            .authored_by(Authorship::FollowedBy(ids.clone()))
            .visible_via(ids);
        let rows = repo.find_posts(&filter, page(0, 10)).await.unwrap();
        let found: Vec<_> = rows.iter().map(|p| p.id.clone()).collect();
        assert_eq!(found, vec![reshare.id.clone(), followed.id.clone()]);
    }

    #[tokio::test]
    async fn counters_update_original_and_retweet_rows() {
        let repo = memory_repository().await;
        let original = post_at("alice", "hi", 2);
        let retweet = Post::new_retweet(&original, "bob");
        repo.create_post(&original).await.unwrap();
        repo.create_post(&retweet).await.unwrap();

        repo.increment_likes(&original.id, 1).await.unwrap();
        repo.increment_retweets(&original.id, 1).await.unwrap();

        for id in [&original.id, &retweet.id] {
            let stored = repo.get_post(id).await.unwrap().unwrap();
            assert_eq!(stored.likes_count, 1);
            assert_eq!(stored.retweets_count, 1);
        }

        repo.increment_likes(&original.id, -5).await.unwrap();
        let stored = repo.get_post(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.likes_count, 0);
    }

    #[tokio::test]
    async fn updates_on_missing_post_report_not_found() {
        let repo = memory_repository().await;
        let err = repo.increment_likes("missing", 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = repo.set_content("missing", "x").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn field_setters_apply_each_field() {
        let repo = memory_repository().await;
        let post = post_at("alice", "old #x", 1);
        repo.create_post(&post).await.unwrap();

        repo.set_content(&post.id, "new #y").await.unwrap();
        repo.set_tags(&post.id, &["y".to_string()]).await.unwrap();
        repo.set_public(&post.id, false).await.unwrap();
        repo.set_mentions(&post.id, &["carol".to_string()]).await.unwrap();
        repo.set_media(&post.id, None).await.unwrap();

        let stored = repo.get_post(&post.id).await.unwrap().unwrap();
        assert_eq!(stored.content, "new #y");
        assert_eq!(stored.tags, vec!["y".to_string()]);
        assert!(!stored.public);
        assert_eq!(stored.mentions, vec!["carol".to_string()]);
        assert!(stored.media.is_none());
    }

    #[tokio::test]
    async fn delete_original_cascades_to_relations_and_retweet_rows() {
        let repo = memory_repository().await;
        let original = post_at("alice", "bye", 2);
        let retweet = Post::new_retweet(&original, "bob");
        repo.create_post(&original).await.unwrap();
        repo.add_retweet(&retweet).await.unwrap();
        repo.add_like(&original.id, "carol").await.unwrap();
        repo.add_bookmark("carol", &retweet.id).await.unwrap();

        repo.delete_post(&original.id).await.unwrap();

        assert!(repo.get_post(&original.id).await.unwrap().is_none());
        assert!(repo.get_post(&retweet.id).await.unwrap().is_none());
        assert!(!repo.has_liked(&original.id, "carol").await.unwrap());
        assert!(!repo.has_retweeted(&original.id, "bob").await.unwrap());
        assert!(
            repo.list_bookmarked_posts("carol", page(0, 10))
                .await
                .unwrap()
                .is_empty()
        );

        let err = repo.delete_post(&original.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
