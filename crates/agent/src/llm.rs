use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reply substituted when the generation API answers successfully but the
/// response carries no usable text at the expected path.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, no response received.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation endpoint returned status {status}")]
    Status { status: u16 },
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

/// Gemini `generateContent` client.
///
/// One POST per turn with a bounded timeout and no retries; a timed-out or
/// failed call surfaces immediately as [`GenerationError`] and the caller
/// decides how to degrade.
pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = GenerateContentRequest::from_prompt(prompt);
        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.config.api_key.expose_secret())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::Status { status: status.as_u16() });
        }

        let payload = response.json::<GenerateContentResponse>().await?;
        Ok(payload.into_text().unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()))
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart { text: prompt.to_string() }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

// Every level defaults so a sparse or malformed payload degrades to "no
// content" instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .next()?
            .text
    }
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{GeminiClient, GeminiConfig, GenerateContentRequest, GenerateContentResponse};

    fn client_fixture() -> GeminiClient {
        GeminiClient::new(GeminiConfig {
            api_key: "test-key".to_string().into(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout: Duration::from_secs(5),
        })
        .expect("client should build")
    }

    #[test]
    fn request_body_matches_the_wire_shape() {
        let body = GenerateContentRequest::from_prompt("hello there");
        let json = serde_json::to_value(&body).expect("request should serialize");

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello there");
    }

    #[test]
    fn generate_url_joins_base_and_model() {
        let client = client_fixture();
        assert_eq!(
            client.generate_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn response_text_is_read_from_the_first_candidate() {
        let payload: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Namaste!"},{"text":"ignored"}]}}]}"#,
        )
        .expect("payload should parse");

        assert_eq!(payload.into_text().as_deref(), Some("Namaste!"));
    }

    #[test]
    fn sparse_payloads_degrade_to_no_content() {
        let empty: GenerateContentResponse =
            serde_json::from_str("{}").expect("empty object should parse");
        assert_eq!(empty.into_text(), None);

        let no_parts: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{}}]}"#).expect("should parse");
        assert_eq!(no_parts.into_text(), None);

        let no_text: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#)
                .expect("should parse");
        assert_eq!(no_text.into_text(), None);
    }
}
