use crate::domain::entities::{MediaInfo, Post};
use crate::shared::error::AppError;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqliteRow};

pub(super) fn map_post_row(row: &SqliteRow) -> Result<Post, AppError> {
    let created_at: i64 = row.try_get("created_at")?;
    let tags_json: String = row.try_get("tags").unwrap_or_default();
    let mentions_json: String = row.try_get("mentions").unwrap_or_default();
    let media_json: Option<String> = row.try_get("media")?;

    Ok(Post {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        author_id: row.try_get("author_id")?,
        created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_else(Utc::now),
        public: row.try_get("public")?,
        tags: parse_string_list(&tags_json),
        mentions: parse_string_list(&mentions_json),
        media: media_json.as_deref().and_then(parse_media),
        likes_count: to_count(row.try_get("likes_count")?),
        retweets_count: to_count(row.try_get("retweets_count")?),
        blocked: row.try_get("blocked")?,
        is_retweet: row.try_get("is_retweet")?,
        retweet_author_id: row.try_get("retweet_author_id")?,
        original_post_id: row.try_get("original_post_id")?,
    })
}

pub(super) fn map_post_rows(rows: Vec<SqliteRow>) -> Result<Vec<Post>, AppError> {
    rows.iter().map(map_post_row).collect()
}

pub(super) fn serialize_string_list(values: &[String]) -> Result<String, AppError> {
    Ok(serde_json::to_string(values)?)
}

pub(super) fn serialize_media(media: Option<&MediaInfo>) -> Result<Option<String>, AppError> {
    media
        .map(serde_json::to_string)
        .transpose()
        .map_err(AppError::from)
}

fn parse_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

fn parse_media(json: &str) -> Option<MediaInfo> {
    serde_json::from_str(json).ok()
}

fn to_count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}
