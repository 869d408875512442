use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One `(tag, post time)` pair unwound from a post's tag list.
#[derive(Debug, Clone, PartialEq)]
pub struct TagOccurrence {
    pub tag: String,
    pub created_at: DateTime<Utc>,
}

impl TagOccurrence {
    pub fn new(tag: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            tag: tag.into(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingTag {
    pub tag: String,
    pub occurrences: u64,
    pub avg_age_hours: f64,
    pub score: f64,
}

#[derive(Default)]
struct Bucket {
    occurrences: u64,
    total_age_hours: f64,
}

/// Ranks tags by `occurrences × e^(−decay_rate × avg_age_hours)`, highest
/// first, keeping at most `top_n`. Equal scores fall back to tag order so the
/// ranking is deterministic.
pub fn rank_tags<I>(occurrences: I, now: DateTime<Utc>, decay_rate: f64, top_n: usize) -> Vec<TrendingTag>
where
    I: IntoIterator<Item = TagOccurrence>,
{
    let mut buckets: HashMap<String, Bucket> = HashMap::new();
    for occurrence in occurrences {
        let age_hours = (now - occurrence.created_at).num_milliseconds() as f64 / 3_600_000.0;
        let bucket = buckets.entry(occurrence.tag).or_default();
        bucket.occurrences += 1;
        bucket.total_age_hours += age_hours;
    }

    let mut ranked: Vec<TrendingTag> = buckets
        .into_iter()
        .map(|(tag, bucket)| {
            let avg_age_hours = bucket.total_age_hours / bucket.occurrences as f64;
            TrendingTag {
                score: decayed_score(bucket.occurrences, avg_age_hours, decay_rate),
                tag,
                occurrences: bucket.occurrences,
                avg_age_hours,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.tag.cmp(&b.tag))
    });
    ranked.truncate(top_n);
    ranked
}

pub fn decayed_score(occurrences: u64, avg_age_hours: f64, decay_rate: f64) -> f64 {
    occurrences as f64 * (-decay_rate * avg_age_hours).exp()
}
