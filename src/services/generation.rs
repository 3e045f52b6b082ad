use std::fmt::Debug;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::{
    config::PlannerConfig,
    error::{PlannerError, Result},
    schemas::{CompletionSchema, SYSTEM_INSTRUCTION},
    services::openai_client::{ChatCompletionRequest, OpenAIClient},
    types::ItineraryResult,
};

/// Text-completion collaborator: takes the full prompt, returns raw text.
///
/// Implementations may fail with a transport or service error; whatever text
/// they return is classified by the result schema validator.
#[async_trait]
pub trait Generator: Send + Sync + Debug {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// [`Generator`] backed by an OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatGenerator {
    client: OpenAIClient,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    structured_output: bool,
}

impl ChatGenerator {
    pub fn new(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            max_tokens: None,
            temperature: None,
            structured_output: false,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            PlannerError::Config(
                "an API key is required for generation (set OPENAI_API_KEY or --api-key)"
                    .to_string(),
            )
        })?;

        let mut client = OpenAIClient::new(api_key, config.timeout)?;
        client.set_base_url(config.base_url.clone());

        Ok(Self::new(client, config.model.clone())
            .with_max_tokens(config.max_tokens)
            .with_structured_output(config.structured_output))
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Also send the itinerary JSON schema as `response_format`.
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        let messages = vec![
            json!({ "role": "system", "content": SYSTEM_INSTRUCTION }),
            json!({ "role": "user", "content": prompt }),
        ];

        let mut request = ChatCompletionRequest::new(self.model.clone(), messages)
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        if self.structured_output {
            request = request.with_response_format(ItineraryResult::schema().response_format());
        }

        request.into_value()
    }
}

#[async_trait]
impl Generator for ChatGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = self.request_body(prompt);
        info!(
            target: "trip::generation",
            model = %self.model,
            prompt_bytes = prompt.len(),
            "requesting itinerary"
        );

        let response = self.client.chat_completion(&body).await?;
        let content = extract_message_content(&response)?;

        debug!(target: "trip::generation", bytes = content.len(), "completion received");
        Ok(content)
    }
}

fn extract_message_content(response: &Value) -> Result<String> {
    let first_choice = response
        .get("choices")
        .and_then(|value| value.as_array())
        .and_then(|choices| choices.first())
        .ok_or_else(|| {
            PlannerError::GenerationService(
                "Completion response contained no choices".to_string(),
            )
        })?;

    first_choice
        .get("message")
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(|content| content.to_string())
        .ok_or_else(|| {
            PlannerError::GenerationService(
                "Completion response missing assistant message content".to_string(),
            )
        })
}
