use crate::shared::FeedConfig;
use serde::Serialize;

/// Offset pagination window. `limit` is always within `1..=max_limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(skip: Option<u32>, limit: Option<u32>, config: &FeedConfig) -> Self {
        let limit = limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));
        Self {
            skip: skip.unwrap_or(0),
            limit,
        }
    }

    /// Rows requested from storage: one extra row signals a further page.
    pub fn fetch_limit(&self) -> u32 {
        self.limit + 1
    }

    /// Trims an over-fetched row set and derives `next_offset`.
    pub fn paginate<T>(&self, mut rows: Vec<T>) -> Page<T> {
        let has_more = rows.len() > self.limit as usize;
        rows.truncate(self.limit as usize);
        Page {
            items: rows,
            limit: self.limit,
            next_offset: has_more.then(|| self.skip + self.limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub limit: u32,
    pub next_offset: Option<u32>,
}

impl<T> Page<T> {
    pub fn empty(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            limit,
            next_offset: None,
        }
    }

    /// Splits the items off, leaving an empty page carrying the same metadata.
    pub fn take_items(self) -> (Vec<T>, Page<T>) {
        let items = self.items;
        (
            items,
            Page {
                items: Vec::new(),
                limit: self.limit,
                next_offset: self.next_offset,
            },
        )
    }

    pub fn map_items<U>(self, items: Vec<U>) -> Page<U> {
        Page {
            items,
            limit: self.limit,
            next_offset: self.next_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped_to_max() {
        let page = PageRequest::new(Some(0), Some(500), &FeedConfig::default());
        assert_eq!(page.limit, 30);
        assert_eq!(page.fetch_limit(), 31);
    }

    #[test]
    fn zero_limit_becomes_one_and_missing_limit_uses_default() {
        let config = FeedConfig::default();
        assert_eq!(PageRequest::new(None, Some(0), &config).limit, 1);
        assert_eq!(PageRequest::new(None, None, &config).limit, 10);
    }

    #[test]
    fn next_offset_only_when_extra_row_exists() {
        let request = PageRequest {
            skip: 4,
            limit: 2,
        };
        let page = request.paginate(vec![1, 2, 3]);
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.next_offset, Some(6));

        let last = request.paginate(vec![1, 2]);
        assert_eq!(last.items, vec![1, 2]);
        assert_eq!(last.next_offset, None);
    }
}
