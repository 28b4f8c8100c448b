use crate::config::LLMConfig;
use crate::llm::client::{LLMClient, LLMClientFactory, TextStream};
use crate::types::{AppError, Result};
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// Client for OpenAI-compatible chat APIs.
pub struct OpenAIClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIClient {
    /// Creates a client for `model` at an OpenAI-compatible `api_base`.
    pub fn new(api_key: String, api_base: String, model: String) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the sampling temperature for all requests from this client.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Caps the completion length for all requests from this client.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    fn build_request(
        &self,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> Result<async_openai::types::chat::CreateChatCompletionRequest> {
        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages);
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            // OpenRouter reads max_tokens, not max_completion_tokens.
            #[allow(deprecated)]
            builder.max_tokens(max_tokens);
        }
        builder
            .build()
            .map_err(|e| AppError::LLM(format!("Failed to build request: {}", e)))
    }
}

fn history_messages(messages: &[(String, String)]) -> Vec<ChatCompletionRequestMessage> {
    messages
        .iter()
        .map(|(role, content)| match role.as_str() {
            "system" => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessage::from(content.clone()),
            ),
            "assistant" => {
                ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                    content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                        content.clone(),
                    )),
                    ..Default::default()
                })
            }
            _ => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                content.clone(),
            )),
        })
        .collect()
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = self.build_request(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt.to_string()),
        )])?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }

    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String> {
        let request = self.build_request(history_messages(messages))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| AppError::LLM("No response from OpenAI".to_string()))
    }

    async fn stream_with_system(&self, system: &str, prompt: &str) -> Result<TextStream> {
        let request = self.build_request(vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                system.to_string(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                prompt.to_string(),
            )),
        ])?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AppError::LLM(format!("OpenAI API error: {}", e)))?;

        let result_stream = async_stream::stream! {
            while let Some(result) = stream.next().await {
                match result {
                    Ok(response) => {
                        for choice in response.choices {
                            if let Some(content) = choice.delta.content {
                                yield Ok(content);
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(AppError::LLM(format!("Stream error: {}", e)));
                    }
                }
            }
        };

        Ok(Box::new(Box::pin(result_stream)))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Production [`LLMClientFactory`] backed by OpenAI-compatible endpoints.
///
/// Carries the server-wide API base and model names; the per-user API key
/// arrives at call time.
pub struct OpenAIClientFactory {
    api_base: String,
    planning_model: String,
    synthesis_model: String,
    followup_model: String,
}

impl OpenAIClientFactory {
    /// Builds a factory from the server's LLM configuration.
    pub fn new(llm: &LLMConfig) -> Self {
        Self {
            api_base: llm.api_base.clone(),
            planning_model: llm.planning_model.clone(),
            synthesis_model: llm.synthesis_model.clone(),
            followup_model: llm.followup_model.clone(),
        }
    }
}

impl LLMClientFactory for OpenAIClientFactory {
    fn planner(&self, api_key: &str) -> Arc<dyn LLMClient> {
        Arc::new(
            OpenAIClient::new(
                api_key.to_string(),
                self.api_base.clone(),
                self.planning_model.clone(),
            )
            .with_temperature(0.0),
        )
    }

    fn synthesizer(&self, api_key: &str) -> Arc<dyn LLMClient> {
        Arc::new(OpenAIClient::new(
            api_key.to_string(),
            self.api_base.clone(),
            self.synthesis_model.clone(),
        ))
    }

    fn follow_up(&self, api_key: &str) -> Arc<dyn LLMClient> {
        Arc::new(
            OpenAIClient::new(
                api_key.to_string(),
                self.api_base.clone(),
                self.followup_model.clone(),
            )
            .with_temperature(0.4)
            .with_max_tokens(2048),
        )
    }
}
