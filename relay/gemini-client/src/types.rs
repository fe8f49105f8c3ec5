use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

impl GenerateContentRequest {
    pub fn new(prompt: &str, declarations: Vec<FunctionDeclaration>) -> Self {
        let (tools, tool_config) = if declarations.is_empty() {
            (Vec::new(), None)
        } else {
            (
                vec![Tool {
                    function_declarations: declarations,
                }],
                Some(ToolConfig::auto()),
            )
        };

        Self {
            contents: vec![Content::user(prompt)],
            tools,
            tool_config,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<TextPart>,
}

impl Content {
    pub fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![TextPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct TextPart {
    pub text: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// A function the model may ask the caller to run instead of answering.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    /// OpenAPI-style object schema. Left out for functions without
    /// parameters, the API refuses an OBJECT schema with no properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl FunctionDeclaration {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ToolConfig {
    pub function_calling_config: FunctionCallingConfig,
}

impl ToolConfig {
    pub fn auto() -> Self {
        Self {
            function_calling_config: FunctionCallingConfig {
                mode: FunctionCallingMode::Auto,
            },
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct FunctionCallingConfig {
    pub mode: FunctionCallingMode,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionCallingMode {
    Auto,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Why the prompt or the first candidate produced no content, when the
    /// API says so (e.g. `SAFETY`).
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_deref())
            .or_else(|| {
                self.candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.as_deref())
                    .filter(|reason| *reason != "STOP")
            })
    }

    /// Only the first part of the first candidate is acted upon.
    pub fn into_reply(self) -> ModelReply {
        let part = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next());

        match part {
            Some(Part::FunctionCall(call)) if !call.name.is_empty() => {
                ModelReply::FunctionCall(call)
            }
            Some(Part::Text(text)) if !text.is_empty() => ModelReply::Text(text),
            _ => ModelReply::Empty,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CandidateContent {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

/// One content part of a candidate, resolved to its kind while decoding.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "RawPart")]
pub enum Part {
    FunctionCall(FunctionCall),
    Text(String),
    Unsupported,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCall>,
}

impl From<RawPart> for Part {
    fn from(raw: RawPart) -> Self {
        match (raw.function_call, raw.text) {
            (Some(call), _) => Part::FunctionCall(call),
            (None, Some(text)) => Part::Text(text),
            (None, None) => Part::Unsupported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    FunctionCall(FunctionCall),
    Text(String),
    Empty,
}
