use crate::{functions::FunctionRegistry, InboundEvent};

use anyhow::{Context, Result};
use async_trait::async_trait;
use gemini_client::{FunctionDeclaration, ModelReply};
use std::sync::Arc;
use tracing::instrument;

pub const UNKNOWN_FUNCTION_REPLY: &str = "cannot handle this function call";
pub const NO_CONTENT_REPLY: &str = "unable to generate a reply";
pub const APOLOGY_REPLY: &str = "Sorry, something went wrong while generating a reply.";

/// The generative model answering messages.
#[async_trait]
pub trait Model: Send + Sync {
    async fn generate(&self, prompt: &str, functions: &[FunctionDeclaration])
        -> Result<ModelReply>;
}

#[async_trait]
impl Model for gemini_client::Client {
    async fn generate(
        &self,
        prompt: &str,
        functions: &[FunctionDeclaration],
    ) -> Result<ModelReply> {
        gemini_client::Client::generate(self, prompt, functions).await
    }
}

/// Sends the answer back to the conversation a reply token belongs to.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}

#[async_trait]
impl Messenger for line_client::Client {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        self.reply_text(reply_token, text).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Reply(String),
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    UnknownFunction(String),
    NoContent,
}

impl FallbackReason {
    pub fn reply_text(&self) -> &'static str {
        match self {
            FallbackReason::UnknownFunction(_) => UNKNOWN_FUNCTION_REPLY,
            FallbackReason::NoContent => NO_CONTENT_REPLY,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    /// The resolved text was delivered.
    Sent(String),
    /// Handling failed and the apology was delivered instead.
    Recovered,
    /// Handling failed and so did the apology.
    Failed,
}

impl ReplyOutcome {
    fn label(&self) -> &'static str {
        match self {
            ReplyOutcome::Sent(_) => "sent",
            ReplyOutcome::Recovered => "recovered",
            ReplyOutcome::Failed => "failed",
        }
    }
}

#[derive(Clone)]
pub struct MessageHandler {
    model: Arc<dyn Model>,
    messenger: Arc<dyn Messenger>,
    functions: Arc<FunctionRegistry>,
}

impl MessageHandler {
    pub fn new(
        model: Arc<dyn Model>,
        messenger: Arc<dyn Messenger>,
        functions: FunctionRegistry,
    ) -> Self {
        Self {
            model,
            messenger,
            functions: Arc::new(functions),
        }
    }

    /// Answer one message with exactly one reply. Failures are logged here
    /// and never reach the caller.
    #[instrument(skip_all, fields(reply_token = %event.reply_token, outcome))]
    pub async fn handle(&self, event: InboundEvent) -> ReplyOutcome {
        let span = tracing::Span::current();
        tracing::info!("Received message: {}", event.message_text);

        let outcome = match self.answer(&event).await {
            Ok(text) => ReplyOutcome::Sent(text),
            Err(e) => {
                tracing::error!("Error handling message: {:?}", e);
                match self.messenger.reply(&event.reply_token, APOLOGY_REPLY).await {
                    Ok(()) => ReplyOutcome::Recovered,
                    Err(e) => {
                        tracing::error!("Error sending fallback reply: {:?}", e);
                        ReplyOutcome::Failed
                    }
                }
            }
        };

        span.record("outcome", outcome.label());
        outcome
    }

    async fn answer(&self, event: &InboundEvent) -> Result<String> {
        let declarations = self.functions.declarations();
        let model_reply = self
            .model
            .generate(&event.message_text, &declarations)
            .await
            .context("model request failed")?;

        let text = match self.resolve(model_reply)? {
            Resolution::Reply(text) => text,
            Resolution::Fallback(reason) => {
                tracing::warn!("Using fallback reply: {:?}", reason);
                reason.reply_text().to_string()
            }
        };
        tracing::info!("Reply: {}", text);

        self.messenger
            .reply(&event.reply_token, &text)
            .await
            .context("reply send failed")?;
        Ok(text)
    }

    /// Turn the model's answer into reply text, running the requested
    /// function when there is one.
    pub fn resolve(&self, reply: ModelReply) -> Result<Resolution> {
        match reply {
            ModelReply::FunctionCall(call) => match self.functions.get(&call.name) {
                Some(function) => {
                    tracing::info!("Model requested function {}", call.name);
                    let text = function
                        .call(&call.args)
                        .with_context(|| format!("function {} failed", call.name))?;
                    Ok(Resolution::Reply(text))
                }
                None => Ok(Resolution::Fallback(FallbackReason::UnknownFunction(
                    call.name,
                ))),
            },
            ModelReply::Text(text) => Ok(Resolution::Reply(text)),
            ModelReply::Empty => Ok(Resolution::Fallback(FallbackReason::NoContent)),
        }
    }
}
