pub mod entities;
pub mod post_filter;
pub mod trending;
pub mod value_objects;
