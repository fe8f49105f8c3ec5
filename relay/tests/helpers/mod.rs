//! In-memory model and messenger doubles shared by the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use async_trait::async_trait;
use gemini_client::{FunctionCall, FunctionDeclaration, ModelReply};
use relay::functions::FunctionRegistry;
use relay::handler::{MessageHandler, Messenger, Model};
use relay::webhook::AppState;
use std::sync::{Arc, Mutex};

pub const CHANNEL_SECRET: &str = "test-channel-secret";

pub struct FakeModel {
    reply: std::result::Result<ModelReply, String>,
    pub prompts: Mutex<Vec<String>>,
    pub offered: Mutex<Vec<Vec<String>>>,
}

impl FakeModel {
    pub fn replying(reply: ModelReply) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            prompts: Mutex::default(),
            offered: Mutex::default(),
        })
    }

    pub fn text(text: &str) -> Arc<Self> {
        Self::replying(ModelReply::Text(text.to_string()))
    }

    pub fn calling(name: &str) -> Arc<Self> {
        Self::replying(ModelReply::FunctionCall(FunctionCall {
            name: name.to_string(),
            args: Default::default(),
        }))
    }

    pub fn failing(error: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error.to_string()),
            prompts: Mutex::default(),
            offered: Mutex::default(),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Model for FakeModel {
    async fn generate(
        &self,
        prompt: &str,
        functions: &[FunctionDeclaration],
    ) -> Result<ModelReply> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.offered
            .lock()
            .unwrap()
            .push(functions.iter().map(|f| f.name.clone()).collect());
        self.reply.clone().map_err(|e| anyhow::anyhow!(e))
    }
}

/// Records every reply. Fails the first `failures` sends.
#[derive(Default)]
pub struct FakeMessenger {
    failures: Mutex<usize>,
    pub sent: Mutex<Vec<(String, String)>>,
}

impl FakeMessenger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(failures),
            sent: Mutex::default(),
        })
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for FakeMessenger {
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()> {
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            anyhow::bail!("LINE reply API error HTTP 400: Invalid reply token");
        }
        self.sent
            .lock()
            .unwrap()
            .push((reply_token.to_string(), text.to_string()));
        Ok(())
    }
}

pub fn handler(model: Arc<FakeModel>, messenger: Arc<FakeMessenger>) -> MessageHandler {
    handler_with(model, messenger, FunctionRegistry::with_defaults())
}

pub fn handler_with(
    model: Arc<FakeModel>,
    messenger: Arc<FakeMessenger>,
    functions: FunctionRegistry,
) -> MessageHandler {
    MessageHandler::new(model, messenger, functions)
}

pub fn app_state(model: Arc<FakeModel>, messenger: Arc<FakeMessenger>) -> AppState {
    AppState {
        channel_secret: Arc::from(CHANNEL_SECRET),
        handler: handler(model, messenger),
    }
}
