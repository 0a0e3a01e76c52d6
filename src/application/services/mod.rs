//! Application services - Business logic orchestration

pub mod command_service;
pub mod webhook_service;

pub use command_service::CommandResolver;
pub use webhook_service::WebhookHandler;
