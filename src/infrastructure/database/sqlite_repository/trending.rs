use super::SqliteRepository;
use super::queries::SELECT_TAG_OCCURRENCES;
use crate::application::ports::repositories::TrendingSource;
use crate::domain::trending::TagOccurrence;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::Row;

#[async_trait]
impl TrendingSource for SqliteRepository {
    async fn tag_occurrences(&self) -> Result<Vec<TagOccurrence>, AppError> {
        let rows = sqlx::query(SELECT_TAG_OCCURRENCES)
            .fetch_all(self.pool.get_pool())
            .await?;

        let mut occurrences = Vec::with_capacity(rows.len());
        for row in rows {
            let tag: String = row.try_get("tag")?;
            let created_at: i64 = row.try_get("created_at")?;
            let Some(created_at) = DateTime::from_timestamp_millis(created_at) else {
                continue;
            };
            occurrences.push(TagOccurrence::new(tag, created_at));
        }
        Ok(occurrences)
    }
}
