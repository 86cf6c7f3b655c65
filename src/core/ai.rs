// model integration - providers that can answer or ask for sql via tool calls

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::tool::TOOL_NAME;
use crate::Error;

const CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Result of a tool call, fed back to the model.
    Tool,
}

/// One conversational unit. `tool_calls` is only ever non-empty on assistant
/// messages; `tool_call_id` is only ever set on tool-result messages and
/// points back at the call it answers.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A request from the model to run a named tool.
#[derive(Debug, Clone)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCall {
    /// The required `query` argument, when present and a string.
    pub fn query(&self) -> Option<&str> {
        self.arguments.get("query")?.as_str()
    }
}

/// The model collaborator: full history in, one assistant message out.
#[async_trait]
pub trait Model: Send + Sync {
    async fn complete(&self, system: &str, history: &[Message]) -> Result<Message, Error>;
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Provider {
    Claude,
    Openai,
}

impl Provider {
    pub fn client(self, api_key: Option<String>) -> Result<Box<dyn Model>, Error> {
        match self {
            Provider::Claude => Ok(Box::new(Claude::new(api_key)?)),
            Provider::Openai => Ok(Box::new(OpenAi::new(api_key)?)),
        }
    }
}

// json schema for the single registered tool
fn tool_parameters() -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "The SQL SELECT query to execute"
            }
        },
        "required": ["query"]
    })
}

const TOOL_DESCRIPTION: &str =
    "Execute a read-only SQL SELECT query against the database and return the results as text.";

pub struct Claude {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

// what claude sends back
#[derive(Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
}

impl Claude {
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        // check common env var names for the api key
        let api_key = match api_key {
            Some(key) => key,
            None => std::env::var("ANTHROPIC_API_KEY")
                .or_else(|_| std::env::var("CLAUDE_API_KEY"))
                .or_else(|_| std::env::var("CLAUDE_KEY"))
                .map_err(|_| {
                    Error::MissingApiKey("ANTHROPIC_API_KEY, CLAUDE_API_KEY, or CLAUDE_KEY")
                })?,
        };

        let model = std::env::var("CLAUDE_MODEL").unwrap_or_else(|_| CLAUDE_MODEL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    // our messages in anthropic wire form - tool results travel as user
    // messages carrying tool_result blocks
    fn convert(history: &[Message]) -> Vec<Value> {
        history
            .iter()
            .map(|msg| match msg.role {
                Role::User => json!({ "role": "user", "content": msg.content }),
                Role::Assistant => {
                    let mut blocks = Vec::new();
                    if !msg.content.is_empty() {
                        blocks.push(json!({ "type": "text", "text": msg.content }));
                    }
                    for call in &msg.tool_calls {
                        blocks.push(json!({
                            "type": "tool_use",
                            "id": call.id,
                            "name": call.name,
                            "input": call.arguments,
                        }));
                    }
                    json!({ "role": "assistant", "content": blocks })
                }
                Role::Tool => json!({
                    "role": "user",
                    "content": [{
                        "type": "tool_result",
                        "tool_use_id": msg.tool_call_id,
                        "content": msg.content,
                    }],
                }),
            })
            .collect()
    }
}

#[async_trait]
impl Model for Claude {
    async fn complete(&self, system: &str, history: &[Message]) -> Result<Message, Error> {
        let request = json!({
            "model": self.model,
            "max_tokens": 1024,
            "system": system,
            "messages": Self::convert(history),
            "tools": [{
                "name": TOOL_NAME,
                "description": TOOL_DESCRIPTION,
                "input_schema": tool_parameters(),
            }],
        });

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response.text().await?;
            return Err(Error::Model(error));
        }

        let response: ClaudeResponse = response.json().await?;

        let mut content = String::new();
        let mut tool_calls = Vec::new();
        for block in response.content {
            match block {
                ClaudeBlock::Text { text } => content.push_str(&text),
                ClaudeBlock::ToolUse { id, name, input } => tool_calls.push(ToolCall {
                    id,
                    name,
                    arguments: input,
                }),
            }
        }

        Ok(Message::assistant(content.trim().to_string(), tool_calls))
    }
}

pub struct OpenAi {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiFunction,
}

#[derive(Deserialize)]
struct OpenAiFunction {
    name: String,
    // json-encoded string, not an object
    arguments: String,
}

impl OpenAi {
    pub fn new(api_key: Option<String>) -> Result<Self, Error> {
        let api_key = match api_key {
            Some(key) => key,
            None => std::env::var("OPENAI_API_KEY")
                .map_err(|_| Error::MissingApiKey("OPENAI_API_KEY"))?,
        };

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| OPENAI_MODEL.to_string());

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        })
    }

    fn convert(system: &str, history: &[Message]) -> Vec<Value> {
        let mut messages = vec![json!({ "role": "system", "content": system })];

        for msg in history {
            messages.push(match msg.role {
                Role::User => json!({ "role": "user", "content": msg.content }),
                Role::Assistant => {
                    let content = if msg.content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(msg.content.clone())
                    };
                    let calls: Vec<Value> = msg
                        .tool_calls
                        .iter()
                        .map(|call| {
                            json!({
                                "id": call.id,
                                "type": "function",
                                "function": {
                                    "name": call.name,
                                    "arguments": call.arguments.to_string(),
                                },
                            })
                        })
                        .collect();
                    if calls.is_empty() {
                        json!({ "role": "assistant", "content": content })
                    } else {
                        json!({ "role": "assistant", "content": content, "tool_calls": calls })
                    }
                }
                Role::Tool => json!({
                    "role": "tool",
                    "tool_call_id": msg.tool_call_id,
                    "content": msg.content,
                }),
            });
        }

        messages
    }
}

#[async_trait]
impl Model for OpenAi {
    async fn complete(&self, system: &str, history: &[Message]) -> Result<Message, Error> {
        let request = json!({
            "model": self.model,
            "messages": Self::convert(system, history),
            "tools": [{
                "type": "function",
                "function": {
                    "name": TOOL_NAME,
                    "description": TOOL_DESCRIPTION,
                    "parameters": tool_parameters(),
                },
            }],
        });

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response.text().await?;
            return Err(Error::Model(error));
        }

        let mut response: OpenAiResponse = response.json().await?;
        if response.choices.is_empty() {
            return Err(Error::Model("empty response from model".to_string()));
        }
        let message = response.choices.remove(0).message;

        let tool_calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                let arguments = serde_json::from_str(&call.function.arguments)
                    .unwrap_or(Value::Object(Default::default()));
                ToolCall {
                    id: call.id,
                    name: call.function.name,
                    arguments,
                }
            })
            .collect();

        Ok(Message::assistant(
            message.content.unwrap_or_default().trim().to_string(),
            tool_calls,
        ))
    }
}
