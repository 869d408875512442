pub mod amqp_publisher;

pub use amqp_publisher::{AmqpEventPublisher, NoopEventPublisher};
