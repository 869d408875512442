pub mod feed_kind;
pub mod hashtags;
pub mod page;

pub use feed_kind::FeedKind;
pub use hashtags::{extract_hashtags, normalize_tags};
pub use page::{Page, PageRequest};
