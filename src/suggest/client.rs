//! Suggestion client for OpenAI-compatible chat completion APIs (OpenRouter
//! by default)

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::{build_prompt, parse_suggestion, response_schema, CourseSuggester};
use crate::config::AiConfig;
use crate::error::SuggestError;
use crate::types::Course;

const SYSTEM_PROMPT: &str = "You are a university academic advisor who plans weekly timetables. \
Days are Monday to Friday, each with four periods (1st Period to 4th Period). \
The term has 18 weeks; list the weeks each course meets as integers from 1 to 18. \
Use Tailwind gradient pairs such as \"from-purple-400 to-blue-500\" for color.";

/// Connection settings for the completion API
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL for the API (e.g., "https://openrouter.ai/api/v1")
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Extra headers to include in requests (e.g., X-Title, HTTP-Referer)
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderConfig {
    /// OpenRouter-style provider at `base_url`
    pub fn openrouter(base_url: impl Into<String>, api_key: String) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            extra_headers: vec![
                ("HTTP-Referer".to_string(), "https://github.com/course-flow".to_string()),
                ("X-Title".to_string(), "Course Flow".to_string()),
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: Value,
}

#[derive(Debug, Clone, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

impl ChatMessage {
    fn system(content: impl Into<String>) -> Self {
        Self { role: "system", content: content.into() }
    }

    fn user(content: impl Into<String>) -> Self {
        Self { role: "user", content: content.into() }
    }
}

/// Asks a hosted model for a schedule
#[derive(Clone)]
pub struct OpenRouterSuggester {
    client: Arc<Client>,
    provider: ProviderConfig,
    model: String,
    suggestion_count: usize,
    max_tokens: u32,
}

impl OpenRouterSuggester {
    /// Build from config and an API key
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, SuggestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            provider: ProviderConfig::openrouter(config.base_url.trim_end_matches('/'), api_key),
            model: config.model.clone(),
            suggestion_count: config.suggestion_count,
            max_tokens: config.max_tokens,
        })
    }

    /// Build from config, reading the key from the keyring
    pub fn from_keyring(config: &AiConfig) -> Result<Self, SuggestError> {
        let api_key = crate::security::get_api_key().map_err(|e| {
            debug!("No API key available: {:#}", e);
            SuggestError::MissingApiKey
        })?;
        Self::new(config, api_key)
    }

    /// Get the provider configuration
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    fn request_body(&self, goal: &str) -> ChatRequest<'_> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(goal, self.suggestion_count)),
            ],
            max_tokens: Some(self.max_tokens),
            response_format: serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "course_schedule",
                    "strict": true,
                    "schema": response_schema(),
                }
            }),
        }
    }

    /// Send one completion request and return the message text
    async fn complete(&self, goal: &str) -> Result<String, SuggestError> {
        let request = self.request_body(goal);

        let mut req_builder = self.client
            .post(format!("{}/chat/completions", self.provider.base_url))
            .header("Authorization", format!("Bearer {}", self.provider.api_key));
        for (key, value) in &self.provider.extra_headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }
        let response = req_builder.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::Status { status, body });
        }

        let body = response.text().await?;
        let raw_response: Value = serde_json::from_str(&body)?;
        extract_content(&raw_response)
            .ok_or_else(|| SuggestError::Malformed("response has no message content".to_string()))
    }
}

#[async_trait]
impl CourseSuggester for OpenRouterSuggester {
    async fn suggest(&self, goal: &str) -> Result<Vec<Course>, SuggestError> {
        info!("Requesting {} suggested courses from {}", self.suggestion_count, self.model);
        let content = self.complete(goal).await?;
        let courses = parse_suggestion(&content)?;
        info!("Received {} suggested courses", courses.len());
        Ok(courses)
    }
}

/// Pull the first choice's text out of a completion response.
///
/// Handles both string content and array-of-content-parts formats.
fn extract_content(raw_response: &Value) -> Option<String> {
    let content_value = raw_response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))?;

    match content_value {
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => {
            let text = parts
                .iter()
                .filter(|part| part.get("type").and_then(|t| t.as_str()) == Some("text"))
                .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("");
            Some(text)
        }
        _ => None,
    }
}
