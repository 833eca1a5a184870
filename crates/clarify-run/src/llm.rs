use std::time::Duration;

use clarify_core::{ClarifyError, LlmConfig};
use serde::Serialize;

/// The opaque generation collaborator: prompt in, review text out.
///
/// Drivers are generic over this trait so tests substitute a deterministic
/// stub for the network client.
#[allow(async_fn_in_trait)]
pub trait Generate {
    /// Generate review text for one prompt. A failure here is fatal for the
    /// batch; drivers do not retry.
    async fn generate(&self, prompt: &str) -> Result<String, ClarifyError>;
}

/// Role in the chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input.
    User,
}

/// A message in a chat conversation with the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint:
/// OpenAI, Ollama, vLLM, LiteLLM, etc.
///
/// # Examples
///
/// ```
/// use clarify_core::LlmConfig;
/// use clarify_run::llm::LlmClient;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = LlmClient::new(&config).unwrap();
/// assert_eq!(client.model(), "gpt-4o-mini");
/// ```
pub struct LlmClient {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new LLM client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Llm`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig) -> Result<Self, ClarifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ClarifyError::Llm(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Return the model name from the configuration.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a single-message chat completion request and return the text.
    ///
    /// Builds a request to `{base_url}/v1/chat/completions` with the prompt
    /// as the sole user message and temperature 0.2.
    ///
    /// # Errors
    ///
    /// Returns [`ClarifyError::Llm`] on HTTP errors or response parsing
    /// failures.
    pub async fn chat(&self, prompt: &str) -> Result<String, ClarifyError> {
        let base_url = self
            .config
            .base_url
            .as_deref()
            .unwrap_or("https://api.openai.com");
        let url = format!("{base_url}/v1/chat/completions");

        let messages = vec![ChatMessage {
            role: Role::User,
            content: prompt.to_string(),
        }];
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": 0.2,
        });

        let mut request = self.client.post(&url);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("Authorization", format!("Bearer {api_key}"));
        }
        request = request.header("Content-Type", "application/json");

        let response = request
            .json(&body)
            .send()
            .await
            .map_err(|e| ClarifyError::Llm(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ClarifyError::Llm(format!(
                "LLM API error {status}: {body_text}"
            )));
        }

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClarifyError::Llm(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                ClarifyError::Llm(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.trim().to_string())
    }
}

impl Generate for LlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, ClarifyError> {
        self.chat(prompt).await
    }
}

/// Environment variable holding the API key for a given provider.
///
/// # Examples
///
/// ```
/// use clarify_run::llm::api_key_env_var;
///
/// assert_eq!(api_key_env_var("gemini"), "GEMINI_API_KEY");
/// assert_eq!(api_key_env_var("openai"), "OPENAI_API_KEY");
/// ```
pub fn api_key_env_var(provider: &str) -> &'static str {
    match provider {
        "anthropic" => "ANTHROPIC_API_KEY",
        "gemini" => "GEMINI_API_KEY",
        _ => "OPENAI_API_KEY",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_construction_succeeds() {
        let config = LlmConfig::default();
        let client = LlmClient::new(&config);
        assert!(client.is_ok());
    }

    #[test]
    fn model_returns_config_model() {
        let config = LlmConfig {
            model: "llama3.1".into(),
            ..LlmConfig::default()
        };
        let client = LlmClient::new(&config).unwrap();
        assert_eq!(client.model(), "llama3.1");
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage {
            role: Role::User,
            content: "hello".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn env_var_defaults_to_openai() {
        assert_eq!(api_key_env_var("ollama"), "OPENAI_API_KEY");
        assert_eq!(api_key_env_var("anthropic"), "ANTHROPIC_API_KEY");
    }
}
