pub mod notification_client;
pub mod user_service_client;

pub use notification_client::{HttpNotifier, NoopNotifier};
pub use user_service_client::UserServiceClient;
