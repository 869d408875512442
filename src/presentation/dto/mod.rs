pub mod page_dto;
pub mod post_dto;
pub mod query_dto;
pub mod trending_dto;

pub use page_dto::{PageEnvelope, Pagination};
pub use post_dto::{
    AuthorDto, CreatePostRequest, EditPostRequest, FeedItemDto, MediaDto, PostDto,
};
pub use query_dto::{FeedQuery, HashtagQuery, PageQuery, WordQuery};
pub use trending_dto::TrendingResponse;

use serde::{Deserialize, Deserializer};

/// Request shape checks that run before a service is called.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Maps a present field to `Some(value)` so that an explicit `null` can be
/// told apart from an absent field in `Option<Option<T>>`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
