mod types;

pub use types::{
    Candidate, CandidateContent, Content, FunctionCall, FunctionCallingConfig,
    FunctionCallingMode, FunctionDeclaration, GenerateContentRequest, GenerateContentResponse,
    ModelReply, Part, PromptFeedback, TextPart, Tool, ToolConfig,
};

use anyhow::Result;
use std::fmt::Debug;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Client {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        tracing::debug!(
            model = %self.model,
            tools_count = request.tools.len(),
            "generateContent request"
        );

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error HTTP {status}: {body}");
        }

        Ok(response.json().await?)
    }

    /// Single-turn generation: one user prompt, the given functions offered in
    /// automatic calling mode, decoded down to the first part of the first
    /// candidate.
    pub async fn generate(
        &self,
        prompt: &str,
        declarations: &[FunctionDeclaration],
    ) -> Result<ModelReply> {
        let request = GenerateContentRequest::new(prompt, declarations.to_vec());
        let response = self.generate_content(&request).await?;
        let block_reason = response.block_reason().map(str::to_string);
        let reply = response.into_reply();
        if reply == ModelReply::Empty {
            tracing::warn!(
                model = %self.model,
                block_reason = block_reason.as_deref().unwrap_or("unknown"),
                "Model returned no usable content"
            );
        }
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server) -> Client {
        Client::new("test-key", DEFAULT_MODEL).with_base_url(server.url())
    }

    #[tokio::test]
    async fn generate_returns_text_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": { "role": "model", "parts": [{ "text": "Hi there" }] },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client(&server).generate("hello", &[]).await.unwrap();

        assert_eq!(reply, ModelReply::Text("Hi there".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_offers_functions_in_auto_mode() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "tools": [{ "functionDeclarations": [{ "name": "get_current_time" }] }],
                "toolConfig": { "functionCallingConfig": { "mode": "AUTO" } }
            })))
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "candidates": [{
                        "content": {
                            "parts": [{ "functionCall": { "name": "get_current_time", "args": {} } }]
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let declarations = vec![FunctionDeclaration::new(
            "get_current_time",
            "Get the current time in the local timezone.",
        )];
        let reply = client(&server)
            .generate("what time is it?", &declarations)
            .await
            .unwrap();

        match reply {
            ModelReply::FunctionCall(call) => assert_eq!(call.name, "get_current_time"),
            other => panic!("expected function call, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn generate_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .with_status(403)
            .with_body("API key not valid")
            .create_async()
            .await;

        let err = client(&server).generate("hello", &[]).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains("403"), "{message}");
        assert!(message.contains("API key not valid"), "{message}");
    }

    #[tokio::test]
    async fn blocked_prompt_is_empty_reply() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "promptFeedback": { "blockReason": "SAFETY" }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let reply = client(&server).generate("something unsafe", &[]).await.unwrap();

        assert_eq!(reply, ModelReply::Empty);
    }

    #[test]
    fn debug_hides_api_key() {
        let client = Client::new("super-secret", DEFAULT_MODEL);
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains(DEFAULT_MODEL));
    }
}
