use crate::clients::error_body;
use crate::config::Config;
use async_trait::async_trait;
use dealerbot_core::llm::{CompletionClient, CompletionError, CompletionRequest};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client for the intent classifier.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(http: Client, cfg: &Config) -> Self {
        Self {
            http,
            base_url: cfg.openai_base_url.clone(),
            api_key: cfg.openai_api_key.clone(),
            model: cfg.openai_model.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            response_format: ResponseFormat { kind: "json_object" },
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body: error_body(resp).await,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::Empty)
    }
}
