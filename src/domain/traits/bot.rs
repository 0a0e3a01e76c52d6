use async_trait::async_trait;
use crate::domain::entities::{InboundEvent, OutboundReply};
use crate::application::errors::BotError;

/// ReplySender trait - abstraction for the messaging platform's reply API
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Send a reply correlated to an inbound event
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), BotError>;

    /// Platform name, used in logs
    fn platform(&self) -> &str;
}

/// Turns a raw webhook body into the text-message events it carries.
///
/// Events that are not text messages are dropped by the implementation.
pub trait WebhookParser: Send + Sync {
    fn parse_events(&self, raw_body: &[u8]) -> Result<Vec<InboundEvent>, BotError>;
}
