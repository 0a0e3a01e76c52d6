//! LINE Messaging API adapter

pub mod events;
pub mod signature;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::application::errors::BotError;
use crate::domain::entities::OutboundReply;
use crate::domain::traits::ReplySender;

pub use events::LineEventParser;
pub use signature::{LineSignatureVerifier, SIGNATURE_HEADER};

/// LINE API base URL
pub const API_BASE: &str = "https://api.line.me";

/// LINE reply client
pub struct LineAdapter {
    access_token: String,
    api_base: String,
    client: Client,
}

impl LineAdapter {
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> Result<Self, BotError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Config(e.to_string()))?;

        Ok(Self {
            access_token: access_token.into(),
            api_base: API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at another API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the API URL for a path
    fn api_url(&self, path: &str) -> String {
        format!("{}/v2/bot/{}", self.api_base, path)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextSendMessage<'a>>,
}

#[derive(Serialize)]
struct TextSendMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[async_trait]
impl ReplySender for LineAdapter {
    async fn send_reply(&self, reply: &OutboundReply) -> Result<(), BotError> {
        let request = ReplyRequest {
            reply_token: &reply.reply_token,
            messages: vec![TextSendMessage {
                kind: "text",
                text: &reply.text,
            }],
        };

        let response = self.client
            .post(self.api_url("message/reply"))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BotError::Network(format!("LINE API timed out: {}", e))
                } else {
                    BotError::Network(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            return Err(BotError::Network(format!("LINE API error {}: {}", status, error)));
        }

        Ok(())
    }

    fn platform(&self) -> &str {
        "line"
    }
}
