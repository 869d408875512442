pub mod feed_service;
pub mod follow_graph;
pub mod interaction_service;
pub mod post_decorator;
pub mod post_service;
pub mod search_service;
pub mod trending_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use feed_service::{FeedRequest, FeedService};
pub use interaction_service::InteractionService;
pub use post_decorator::{DecoratedPost, PostDecorator};
pub use post_service::{CreatePostInput, EditPostInput, PostMetrics, PostService};
pub use search_service::SearchService;
pub use trending_service::TrendingService;
