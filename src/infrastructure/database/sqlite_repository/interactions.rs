use super::SqliteRepository;
use super::posts::insert_post_query;
use super::queries::{
    DELETE_LIKE, DELETE_RETWEET_RETURNING_ROW, INCREMENT_RETWEETS, INSERT_LIKE, INSERT_RETWEET,
    SELECT_LIKE, SELECT_RETWEET,
};
use crate::application::ports::repositories::InteractionRepository;
use crate::domain::entities::Post;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Row, Sqlite};
use std::collections::HashSet;

impl SqliteRepository {
    async fn member_ids(
        &self,
        table: &str,
        id_column: &str,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        builder.push(id_column);
        builder.push(" AS post_id FROM ");
        builder.push(table);
        builder.push(" WHERE user_id = ");
        builder.push_bind(user_id.to_string());
        builder.push(" AND ");
        builder.push(id_column);
        builder.push(" IN (");
        let mut separated = builder.separated(", ");
        for id in post_ids {
            separated.push_bind(id.clone());
        }
        builder.push(")");

        let rows = builder.build().fetch_all(self.pool.get_pool()).await?;
        let mut ids = HashSet::with_capacity(rows.len());
        for row in rows {
            ids.insert(row.try_get::<String, _>("post_id")?);
        }
        Ok(ids)
    }
}

#[async_trait]
impl InteractionRepository for SqliteRepository {
    async fn has_liked(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let row = sqlx::query(SELECT_LIKE)
            .bind(post_id)
            .bind(user_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(row.is_some())
    }

    async fn add_like(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(INSERT_LIKE)
            .bind(post_id)
            .bind(user_id)
            .bind(Utc::now().timestamp_millis())
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, post_id: &str, user_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(DELETE_LIKE)
            .bind(post_id)
            .bind(user_id)
            .execute(self.pool.get_pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn liked_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        self.member_ids("post_likes", "post_id", user_id, post_ids)
            .await
    }

    async fn has_retweeted(
        &self,
        original_post_id: &str,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let row = sqlx::query(SELECT_RETWEET)
            .bind(original_post_id)
            .bind(user_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        Ok(row.is_some())
    }

    async fn add_retweet(&self, retweet: &Post) -> Result<bool, AppError> {
        let (Some(original_post_id), Some(user_id)) = (
            retweet.original_post_id.as_deref(),
            retweet.retweet_author_id.as_deref(),
        ) else {
            return Err(AppError::validation(format!(
                "post {} is not a retweet row",
                retweet.id
            )));
        };
        let now = Utc::now().timestamp_millis();

        let mut tx = self.pool.get_pool().begin().await?;
        let inserted = sqlx::query(INSERT_RETWEET)
            .bind(original_post_id)
            .bind(user_id)
            .bind(&retweet.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        if inserted.rows_affected() == 0 {
            return Ok(false);
        }
        insert_post_query(retweet)?.execute(&mut *tx).await?;
        sqlx::query(INCREMENT_RETWEETS)
            .bind(original_post_id)
            .bind(1_i64)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(true)
    }

    async fn remove_retweet(
        &self,
        original_post_id: &str,
        user_id: &str,
    ) -> Result<Option<String>, AppError> {
        let row = sqlx::query(DELETE_RETWEET_RETURNING_ROW)
            .bind(original_post_id)
            .bind(user_id)
            .fetch_optional(self.pool.get_pool())
            .await?;
        match row {
            Some(row) => Ok(Some(row.try_get("retweet_post_id")?)),
            None => Ok(None),
        }
    }

    async fn retweeted_post_ids(
        &self,
        user_id: &str,
        post_ids: &[String],
    ) -> Result<HashSet<String>, AppError> {
        self.member_ids("post_retweets", "original_post_id", user_id, post_ids)
            .await
    }
}
