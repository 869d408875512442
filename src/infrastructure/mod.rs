pub mod cache;
pub mod database;
pub mod gateways;
pub mod jobs;
pub mod messaging;
