//! LINE webhook event model

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::application::errors::BotError;
use crate::domain::entities::InboundEvent;
use crate::domain::traits::WebhookParser;

/// Webhook request body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookBody {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// Webhook event, tagged by `type`. Only message events are answered.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    pub reply_token: String,
    pub message: MessageContent,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Message payload, tagged by `type`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MessageContent {
    Text(TextMessage),
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextMessage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Event {
    /// The inbound text message this event carries, if any
    pub fn into_text_message(self) -> Option<InboundEvent> {
        let Event::Message(event) = self else {
            return None;
        };
        let MessageContent::Text(message) = event.message else {
            return None;
        };

        Some(
            InboundEvent::new(event.reply_token, message.text)
                .with_user(event.source.and_then(|s| s.user_id))
                .with_timestamp(event.timestamp.and_then(millis_to_datetime)),
        )
    }
}

fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Parses LINE webhook bodies into text-message events
#[derive(Debug, Default, Clone, Copy)]
pub struct LineEventParser;

impl WebhookParser for LineEventParser {
    fn parse_events(&self, raw_body: &[u8]) -> Result<Vec<InboundEvent>, BotError> {
        let body: WebhookBody =
            serde_json::from_slice(raw_body).map_err(|e| BotError::Parse(e.to_string()))?;

        let total = body.events.len();
        let events: Vec<InboundEvent> = body
            .events
            .into_iter()
            .filter_map(Event::into_text_message)
            .collect();

        if events.len() < total {
            tracing::debug!("Ignoring {} non-text event(s)", total - events.len());
        }
        Ok(events)
    }
}
