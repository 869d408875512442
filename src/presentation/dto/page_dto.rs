use crate::domain::value_objects::Page;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<u32>,
}

/// `{data, pagination: {limit, next_offset?}}`
#[derive(Debug, Clone, Serialize)]
pub struct PageEnvelope<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PageEnvelope<T> {
    pub fn from_page<U>(page: Page<U>) -> Self
    where
        T: From<U>,
    {
        Self {
            pagination: Pagination {
                limit: page.limit,
                next_offset: page.next_offset,
            },
            data: page.items.into_iter().map(T::from).collect(),
        }
    }
}
