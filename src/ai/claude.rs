use crate::error::{Result, SentinelError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const CLAUDE_API_URL: &str = "https://api.anthropic.com";
const CLAUDE_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Claude API client
pub struct ClaudeClient {
    api_key: String,
    client: Client,
    api_url: String,
    model: String,
    max_tokens: u32,
}

impl ClaudeClient {
    /// Create a new Claude API client
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key,
            client,
            api_url: CLAUDE_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Set the model to use
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Point the client at another API host
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single-turn prompt and return the text of the reply
    pub async fn complete(&self, prompt: String) -> Result<String> {
        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", CLAUDE_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SentinelError::claude_api(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let claude_response: ClaudeResponse = response.json().await?;

        claude_response
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .map(|block| block.text)
            .ok_or_else(|| SentinelError::claude_api("No content in Claude response"))
    }
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = ClaudeClient::new("sk-ant-test-key".to_string()).unwrap();
        assert_eq!(client.model, DEFAULT_MODEL);
        assert_eq!(client.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(client.api_url, CLAUDE_API_URL);
    }

    #[test]
    fn test_client_builder() {
        let client = ClaudeClient::new("sk-ant-test-key".to_string())
            .unwrap()
            .with_model("claude-3-opus-20240229".to_string())
            .with_max_tokens(8192)
            .with_api_url("http://localhost:8080/");

        assert_eq!(client.model(), "claude-3-opus-20240229");
        assert_eq!(client.max_tokens, 8192);
        assert_eq!(client.api_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_complete_returns_first_text_block() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("x-api-key", "sk-ant-test-key"))
            .and(header("anthropic-version", CLAUDE_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [
                    { "type": "text", "text": "## Weekly progress\nAll good." }
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ClaudeClient::new("sk-ant-test-key".to_string())
            .unwrap()
            .with_api_url(&server.uri());
        let reply = client.complete("Summarize".to_string()).await.unwrap();
        assert_eq!(reply, "## Weekly progress\nAll good.");
    }

    #[tokio::test]
    async fn test_complete_surfaces_api_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid x-api-key"))
            .mount(&server)
            .await;

        let client = ClaudeClient::new("sk-ant-bad".to_string())
            .unwrap()
            .with_api_url(&server.uri());
        let err = client.complete("Summarize".to_string()).await.unwrap_err();
        assert!(matches!(err, SentinelError::ClaudeApi(_)));
        assert!(err.to_string().contains("invalid x-api-key"));
    }
}
