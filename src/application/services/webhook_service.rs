use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use uuid::Uuid;

use super::CommandResolver;
use crate::application::errors::{BotError, HandlerError};
use crate::domain::entities::InboundEvent;
use crate::domain::traits::{ReplySender, SignatureVerifier, WebhookParser};

/// Default bound on a single outbound reply call
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(10);

/// Handles one webhook delivery end to end
pub struct WebhookHandler {
    verifier: Arc<dyn SignatureVerifier>,
    parser: Arc<dyn WebhookParser>,
    sender: Arc<dyn ReplySender>,
    resolver: CommandResolver,
    reply_timeout: Duration,
}

impl WebhookHandler {
    pub fn new(
        verifier: Arc<dyn SignatureVerifier>,
        parser: Arc<dyn WebhookParser>,
        sender: Arc<dyn ReplySender>,
        resolver: CommandResolver,
    ) -> Self {
        Self {
            verifier,
            parser,
            sender,
            resolver,
            reply_timeout: DEFAULT_REPLY_TIMEOUT,
        }
    }

    pub fn with_reply_timeout(mut self, timeout: Duration) -> Self {
        self.reply_timeout = timeout;
        self
    }

    /// Verify, parse and answer every text message in a webhook body.
    ///
    /// Replies are sent concurrently, so a batch takes at most one reply
    /// timeout. A failed reply does not stop the rest of the batch; failures
    /// are reported together once every event has been tried.
    pub async fn handle(&self, raw_body: &[u8], signature: Option<&str>) -> Result<(), HandlerError> {
        let signature = signature.ok_or(HandlerError::MissingSignature)?;

        if !self.verifier.verify(raw_body, signature) {
            return Err(HandlerError::InvalidSignature);
        }

        let events = self.parser.parse_events(raw_body)?;
        let delivery_id = Uuid::new_v4();
        tracing::info!("[{}] Received {} text message(s)", delivery_id, events.len());

        let outcomes = join_all(events.iter().map(|event| self.answer(event))).await;

        let mut failed = 0;
        for (event, outcome) in events.iter().zip(outcomes) {
            if let Err(e) = outcome {
                tracing::error!(
                    "[{}] Failed to reply via {} (user: {:?}): {}",
                    delivery_id,
                    self.sender.platform(),
                    event.user_id,
                    e
                );
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(HandlerError::DeliveryFailed {
                failed,
                total: events.len(),
            });
        }
        Ok(())
    }

    async fn answer(&self, event: &InboundEvent) -> Result<(), BotError> {
        let reply = event.reply(self.resolver.resolve(&event.message_text));
        let preview: String = reply.text.chars().take(100).collect();
        tracing::debug!("Replying to {:?}: {}", event.message_text, preview);

        match tokio::time::timeout(self.reply_timeout, self.sender.send_reply(&reply)).await {
            Ok(result) => result,
            Err(_) => Err(BotError::Timeout(self.reply_timeout)),
        }
    }
}
