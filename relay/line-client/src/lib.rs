pub mod signature;
pub mod webhook;

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;

pub const DEFAULT_BASE_URL: &str = "https://api.line.me";

/// Longest text message the platform accepts, in characters.
pub const MAX_TEXT_LENGTH: usize = 5000;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMessageRequest {
    pub reply_token: String,
    pub messages: Vec<Message>,
}

impl ReplyMessageRequest {
    pub fn text(reply_token: &str, text: &str) -> Self {
        Self {
            reply_token: reply_token.to_string(),
            messages: vec![Message::text(text)],
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text { text: String },
}

impl Message {
    pub fn text(text: &str) -> Self {
        let text = match text.char_indices().nth(MAX_TEXT_LENGTH) {
            Some((cut, _)) => {
                tracing::warn!(
                    "Truncating reply of {} characters to {MAX_TEXT_LENGTH}",
                    text.chars().count()
                );
                &text[..cut]
            }
            None => text,
        };
        Message::Text {
            text: text.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    channel_access_token: String,
    base_url: String,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    pub fn new(channel_access_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            channel_access_token: channel_access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn reply_message(&self, request: &ReplyMessageRequest) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.channel_access_token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("LINE reply API error HTTP {status}: {body}");
        }
        Ok(())
    }

    pub async fn reply_text(&self, reply_token: &str, text: &str) -> Result<()> {
        self.reply_message(&ReplyMessageRequest::text(reply_token, text))
            .await
    }
}
