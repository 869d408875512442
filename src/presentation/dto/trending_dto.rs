use crate::domain::trending::TrendingTag;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TrendingResponse {
    /// Tag strings, highest score first.
    pub tags: Vec<String>,
    pub scores: Vec<TrendingTag>,
}

impl From<Vec<TrendingTag>> for TrendingResponse {
    fn from(ranked: Vec<TrendingTag>) -> Self {
        Self {
            tags: ranked.iter().map(|entry| entry.tag.clone()).collect(),
            scores: ranked,
        }
    }
}
