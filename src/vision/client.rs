//! VisionClient - handles communication with the vision model API.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The environment variable name for the API key.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default base URL for the chat-completion API.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Fixed prompt sent alongside the captured frame.
pub const ANALYSIS_PROMPT: &str = "What is in this image?";

/// Upper bound on the generated description length.
const MAX_RESPONSE_TOKENS: u32 = 300;

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Request body for a chat completion.
#[derive(Debug, Serialize)]
struct ChatRequest {
    /// Model identifier.
    model: String,
    /// Conversation messages; this client always sends exactly one.
    messages: Vec<ChatMessage>,
    /// Maximum number of tokens in the generated response.
    max_tokens: u32,
}

/// A single chat message with mixed text/image content.
#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

/// One part of a multimodal message.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Inline image reference carried as a data URI.
#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

/// Response from the chat-completion endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for describing images via a hosted vision model.
pub struct VisionClient {
    api_key: String,
    base_url: String,
    model: String,
    http_client: reqwest::Client,
}

impl VisionClient {
    /// Create a new VisionClient by reading the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::MissingApiKey` if the `OPENAI_API_KEY`
    /// environment variable is not set.
    pub fn new() -> Result<Self, VisionError> {
        let api_key =
            std::env::var(OPENAI_API_KEY_ENV).map_err(|_| VisionError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    /// Create a new VisionClient with an explicit API key.
    ///
    /// The key is held by the client rather than assigned to any shared
    /// global configuration.
    pub fn with_api_key(api_key: String) -> Result<Self, VisionError> {
        if api_key.is_empty() {
            return Err(VisionError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url: OPENAI_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            http_client,
        })
    }

    /// Create a new VisionClient with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, VisionError> {
        let mut client = Self::with_api_key(api_key)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Create a new VisionClient with a custom model.
    pub fn with_model(api_key: String, model: String) -> Result<Self, VisionError> {
        let mut client = Self::with_api_key(api_key)?;
        client.model = model;
        Ok(client)
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Describe a base64-encoded JPEG image.
    ///
    /// Never fails outward: any error (network, auth, rate limit,
    /// malformed response) is rendered into the returned string, so the
    /// caller always has something displayable.
    pub async fn describe_image(&self, base64_image: &str) -> String {
        match self.request_description(base64_image).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("image analysis failed: {}", e);
                format!("Error analyzing image: {}", e)
            }
        }
    }

    /// Submit the chat-completion request and extract the first choice's
    /// text content.
    ///
    /// # Errors
    ///
    /// Returns `VisionError::HttpError` if the request fails,
    /// `VisionError::ApiError` if the API returns a non-success status,
    /// or `VisionError::MalformedResponse` if the response has no usable
    /// choice content.
    async fn request_description(&self, base64_image: &str) -> Result<String, VisionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: format!("data:image/jpeg;base64,{}", base64_image),
                        },
                    },
                ],
            }],
            max_tokens: MAX_RESPONSE_TOKENS,
        };

        let response = self
            .http_client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VisionError::ApiError(format!(
                "API request failed with status {}: {}",
                status, error_text
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                VisionError::MalformedResponse("no completion choice with content".to_string())
            })
    }
}

/// Errors that can occur during vision API operations.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("API key not configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}
