pub mod post;
pub mod user;

pub use post::{MediaInfo, Post};
pub use user::{AuthorInfo, Identity};
