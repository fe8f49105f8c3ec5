pub mod config;
pub mod functions;
pub mod handler;
pub mod webhook;

/// A text message received from the platform, with the token that routes
/// the answer back to its conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub reply_token: String,
    pub message_text: String,
}

impl InboundEvent {
    pub fn from_webhook_event(event: &line_client::webhook::Event) -> Option<Self> {
        let (reply_token, text) = event.text_message()?;
        Some(Self {
            reply_token: reply_token.to_string(),
            message_text: text.to_string(),
        })
    }
}
