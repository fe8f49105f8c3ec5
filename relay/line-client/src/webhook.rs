//! Callback payload delivered to the webhook endpoint.

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CallbackPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    Message {
        /// Absent for events received in standby mode.
        #[serde(default, rename = "replyToken")]
        reply_token: Option<String>,
        message: EventMessage,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text {
        #[serde(default)]
        id: Option<String>,
        text: String,
    },
    #[serde(other)]
    Other,
}

impl Event {
    /// Reply token and text of a text message event, if this is one.
    pub fn text_message(&self) -> Option<(&str, &str)> {
        match self {
            Event::Message {
                reply_token: Some(reply_token),
                message: EventMessage::Text { text, .. },
            } => Some((reply_token, text)),
            _ => None,
        }
    }
}
