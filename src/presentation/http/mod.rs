pub mod auth;
pub mod error;
pub mod router;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use router::{apply_standard_layers, build_router};
pub use state::AppState;
