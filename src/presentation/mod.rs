pub mod dto;
pub mod handlers;
pub mod http;

pub use http::{build_router, AppState};
