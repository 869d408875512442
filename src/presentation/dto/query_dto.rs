use crate::application::services::FeedRequest;
use crate::domain::value_objects::FeedKind;
use crate::shared::AppError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Parses the required `from_time` cursor (RFC 3339).
pub fn parse_from_time(value: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::validation("from_time is required"))?;
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|_| AppError::validation("from_time must be an RFC 3339 timestamp"))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    pub feed_type: Option<String>,
    pub wanted_user_id: Option<String>,
    pub from_time: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl FeedQuery {
    pub fn into_request(self) -> Result<FeedRequest, AppError> {
        let kind = self
            .feed_type
            .as_deref()
            .and_then(|value| value.parse::<FeedKind>().ok())
            .ok_or_else(|| AppError::validation("bad feed request"))?;
        let from_time = parse_from_time(self.from_time.as_deref())?;
        Ok(FeedRequest {
            kind,
            target_user_id: self.wanted_user_id.filter(|id| !id.trim().is_empty()),
            from_time,
            skip: self.skip,
            limit: self.limit,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WordQuery {
    #[serde(default, alias = "q")]
    pub words: String,
    pub from_time: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// `?tag=a&tag=b` and `?tags=a,b` are both accepted, so the query is read as
/// raw pairs rather than a struct.
#[derive(Debug, Default, PartialEq)]
pub struct HashtagQuery {
    pub tags: Vec<String>,
    pub from_time: Option<String>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl HashtagQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut query = HashtagQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "tag" => query.tags.push(value),
                "tags" => query.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string),
                ),
                "from_time" => query.from_time = Some(value),
                "skip" => query.skip = Some(parse_number("skip", &value)?),
                "limit" => query.limit = Some(parse_number("limit", &value)?),
                _ => {}
            }
        }
        Ok(query)
    }
}

fn parse_number(name: &str, value: &str) -> Result<u32, AppError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| AppError::validation(format!("{name} must be a non-negative integer")))
}
