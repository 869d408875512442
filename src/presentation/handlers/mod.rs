pub mod feed_handler;
pub mod health_handler;
pub mod interaction_handler;
pub mod post_handler;
pub mod search_handler;
pub mod trending_handler;
