use chrono::{DateTime, Utc};

/// A text message received through the webhook, ready to be answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub reply_token: String,
    pub message_text: String,
    pub user_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl InboundEvent {
    pub fn new(reply_token: impl Into<String>, message_text: impl Into<String>) -> Self {
        Self {
            reply_token: reply_token.into(),
            message_text: message_text.into(),
            user_id: None,
            timestamp: None,
        }
    }

    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Turn this event into the reply that answers it
    pub fn reply(&self, text: impl Into<String>) -> OutboundReply {
        OutboundReply {
            reply_token: self.reply_token.clone(),
            text: text.into(),
        }
    }
}

/// Reply correlated to an inbound event by its reply token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub reply_token: String,
    pub text: String,
}
