use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use study_core::model::AiSettings;

use crate::ai::prompt::response_schema;
use crate::error::AiError;

/// A hosted generative model that turns a prompt into JSON text.
#[async_trait]
pub trait AnalysisModel: Send + Sync {
    /// Send one prompt and return the raw message content.
    ///
    /// # Errors
    ///
    /// Returns `AiError` when the request fails, the key is rejected or the
    /// response carries no content.
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, AiError>;

    /// Make a cheap authenticated request to check that `api_key` is accepted.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Unauthorized` when the provider rejects the key.
    async fn validate_key(&self, api_key: &str) -> Result<(), AiError>;
}

/// Client for an OpenAI-compatible chat completions API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: AiSettings,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(settings: AiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &AiSettings {
        &self.settings
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.api_base_url())
    }
}

fn check_status(status: StatusCode) -> Result<(), AiError> {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AiError::Unauthorized),
        status if !status.is_success() => Err(AiError::HttpStatus(status)),
        _ => Ok(()),
    }
}

#[async_trait]
impl AnalysisModel for OpenAiClient {
    async fn generate(&self, api_key: &str, prompt: &str) -> Result<String, AiError> {
        let payload = ChatRequest {
            model: self.settings.api_model().to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            temperature: 0.2,
            response_format: ResponseFormat {
                kind: "json_schema",
                json_schema: JsonSchemaFormat {
                    name: "study_material",
                    strict: true,
                    schema: response_schema(),
                },
            },
        };

        debug!(
            model = self.settings.api_model(),
            prompt_chars = prompt.len(),
            "sending analysis request"
        );
        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;
        check_status(response.status())?;

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }

    async fn validate_key(&self, api_key: &str) -> Result<(), AiError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(api_key)
            .send()
            .await?;
        check_status(response.status())
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
