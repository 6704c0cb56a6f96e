use std::time::{Duration, Instant};

use async_trait::async_trait;
use docqa_core::config::CompletionConfig;
use docqa_core::{ApiKey, Context, Error, ModelProvider, Query, Response, Result, TokenUsage};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

/// Env var conventionally holding the OpenAI API key.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Provider implementation for OpenAI-compatible `/chat/completions` APIs.
pub struct OpenAiProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Session credential.
    api_key: ApiKey,
    /// Full chat completions endpoint URL.
    endpoint: String,
    /// Model name to use.
    model: String,
    /// Generation limit per answer.
    max_tokens: u32,
    /// Sampling temperature.
    temperature: f32,
}

impl OpenAiProvider {
    /// Creates a provider for the configured endpoint and model.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: ApiKey, config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Builds chat messages from context and query.
    fn build_messages(context: &Context, query: &Query) -> Vec<Value> {
        let mut messages = vec![json!({
            "role": "system",
            "content": context.system_prompt
        })];

        if !context.passages.is_empty() {
            messages.push(json!({
                "role": "user",
                "content": format!("Context:\n{}", context.passages_to_string())
            }));
        }

        messages.push(json!({
            "role": "user",
            "content": query.text
        }));

        messages
    }

    /// Extracts the answer text and token usage from a response body.
    fn parse_response(body: &str) -> Result<(String, TokenUsage)> {
        let api_response: ChatCompletionResponse = serde_json::from_str(body)
            .map_err(|err| Error::InvalidResponse(format!("Failed to parse response: {err}")))?;

        let text = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::InvalidResponse("No choices in completion response".to_owned()))?;

        let tokens_used = api_response
            .usage
            .map(|usage| TokenUsage {
                input: usage.prompt_tokens,
                output: usage.completion_tokens,
            })
            .unwrap_or_default();

        Ok((text.trim().to_owned(), tokens_used))
    }
}

/// Response payload returned by the chat completions API.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    /// List of generated choices.
    choices: Vec<Choice>,
    /// Optional token usage statistics returned by the service.
    usage: Option<Usage>,
}

/// Individual completion choice.
#[derive(Deserialize)]
struct Choice {
    /// Message payload representing the completion text.
    message: Message,
}

/// Message structure containing generated content.
#[derive(Deserialize)]
struct Message {
    /// Text content produced by the model.
    content: Option<String>,
}

/// Token accounting information for a response.
#[derive(Deserialize)]
struct Usage {
    /// Number of prompt tokens billed for the request.
    prompt_tokens: u64,
    /// Number of completion tokens returned by the model.
    completion_tokens: u64,
}

#[async_trait]
impl ModelProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, query: &Query, context: &Context) -> Result<Response> {
        let start = Instant::now();

        let request_body = json!({
            "model": self.model,
            "messages": Self::build_messages(context, query),
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        tracing::debug!(
            model = %self.model,
            passages = context.passages.len(),
            estimated_tokens = context.token_estimate(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&request_body)
            .send()
            .await
            .map_err(|err| Error::Completion(format!("Request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Error::Completion(format!("Failed to read response: {err}")))?;

        if !status.is_success() {
            return Err(Error::Completion(format!(
                "API request failed with status {status}: {body}"
            )));
        }

        let (text, tokens_used) = Self::parse_response(&body)?;
        let latency_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            model = %self.model,
            latency_ms,
            input_tokens = tokens_used.input,
            output_tokens = tokens_used.output,
            "Completion received"
        );

        Ok(Response {
            text,
            tokens_used,
            provider: self.name().to_owned(),
            latency_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::Passage;

    /// Tests that the endpoint is derived from the base URL.
    #[test]
    fn test_endpoint_from_base_url() {
        let config = CompletionConfig {
            base_url: "http://localhost:8080/v1/".to_owned(),
            ..CompletionConfig::default()
        };
        let key = ApiKey::parse("test_key").unwrap();
        let provider = OpenAiProvider::new(key, &config).unwrap();
        assert_eq!(provider.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(provider.model, "gpt-3.5-turbo");
    }

    /// Tests that the configured model is used.
    #[test]
    fn test_model_from_config() {
        let config = CompletionConfig {
            model: "custom-model".to_owned(),
            ..CompletionConfig::default()
        };
        let provider = OpenAiProvider::new(ApiKey::parse("test_key").unwrap(), &config).unwrap();
        assert_eq!(provider.model, "custom-model");
        assert_eq!(provider.name(), "openai");
    }

    /// Tests message building without passages.
    #[test]
    fn test_build_messages_without_passages() {
        let context = Context::new("be helpful");
        let query = Query::new("user question");

        let messages = OpenAiProvider::build_messages(&context, &query);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"].as_str(), Some("system"));
        assert_eq!(messages[0]["content"].as_str(), Some("be helpful"));
        assert_eq!(messages[1]["content"].as_str(), Some("user question"));
    }

    /// Tests that retrieved passages are sent ahead of the question.
    #[test]
    fn test_build_messages_with_passages() {
        let context = Context::new("system").with_passages(vec![
            Passage::new("sky.txt", None, "The sky is blue."),
            Passage::new("sky.txt", None, "Grass is green."),
        ]);
        let query = Query::new("What color is the sky?");

        let messages = OpenAiProvider::build_messages(&context, &query);

        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[1]["content"].as_str(),
            Some("Context:\nThe sky is blue.\n\nGrass is green.")
        );
        let last = &messages[messages.len() - 1];
        assert_eq!(last["role"].as_str(), Some("user"));
        assert_eq!(last["content"].as_str(), Some("What color is the sky?"));
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": " Blue. "}}],
            "usage": {"prompt_tokens": 42, "completion_tokens": 3, "total_tokens": 45}
        }"#;

        let (text, usage) = OpenAiProvider::parse_response(body).unwrap();
        assert_eq!(text, "Blue.");
        assert_eq!(usage.input, 42);
        assert_eq!(usage.output, 3);
    }

    #[test]
    fn test_parse_response_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "ok"}}]}"#;
        let (text, usage) = OpenAiProvider::parse_response(body).unwrap();
        assert_eq!(text, "ok");
        assert_eq!(usage, TokenUsage::default());
    }

    #[test]
    fn test_parse_response_rejects_empty_choices() {
        let error = OpenAiProvider::parse_response(r#"{"choices": []}"#).unwrap_err();
        assert!(matches!(error, Error::InvalidResponse(_)));

        let error = OpenAiProvider::parse_response("not json").unwrap_err();
        assert!(matches!(error, Error::InvalidResponse(_)));
    }
}
