//! OpenAI-compatible chat-completions client for advisory text.

use crate::config::toml_config::LlmSettings;
use crate::domain::ports::{AdvisoryPrompt, AdvisoryService};
use crate::utils::error::AdvisoryError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You are a responsible drinking advisor. Give short, practical, \
non-judgemental safety advice. Never encourage drinking or driving after drinking.";

const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct HttpAdvisoryClient {
    client: Client,
    settings: LlmSettings,
}

impl HttpAdvisoryClient {
    pub fn new(settings: LlmSettings) -> Result<Self, AdvisoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| AdvisoryError::Transport(e.to_string()))?;

        Ok(Self { client, settings })
    }

    /// 缺少金鑰時在送出請求前就回報
    fn credential(&self) -> Result<&str, AdvisoryError> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !is_unresolved_placeholder(key))
            .ok_or(AdvisoryError::MissingCredential)
    }

    fn map_send_error(&self, e: reqwest::Error) -> AdvisoryError {
        if e.is_timeout() {
            AdvisoryError::Timeout(self.settings.timeout_seconds)
        } else {
            AdvisoryError::Transport(e.to_string())
        }
    }
}

fn is_unresolved_placeholder(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    }
}

#[async_trait]
impl AdvisoryService for HttpAdvisoryClient {
    async fn advise(&self, prompt: &AdvisoryPrompt) -> Result<String, AdvisoryError> {
        let api_key = self.credential()?;
        let user_prompt = prompt.render();

        let body = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        tracing::debug!("Making advisory request to: {}", self.settings.endpoint);
        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        tracing::debug!("Advisory response status: {}", status);

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);
            return Err(AdvisoryError::UpstreamStatus {
                status: status.as_u16(),
                message: truncate(message.trim(), MAX_ERROR_BODY_CHARS),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AdvisoryError::MalformedResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AdvisoryError::MalformedResponse("no content in response".to_string()))
    }
}
