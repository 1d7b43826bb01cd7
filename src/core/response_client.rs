//! Single-shot prompt → reply client for the Gemini `generateContent` endpoint.
//!
//! The client never fails past its boundary: every outcome, including
//! transport errors and malformed bodies, becomes a displayable string.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{GenerateContentRequest, GenerateContentResponse};
use crate::utils::url::generate_content_url;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Reply used when the endpoint answered without a usable candidate.
pub const NO_RESPONSE_REPLY: &str = "No response from AI.";

/// Reply used when the request or its body could not be processed.
pub const FAILURE_REPLY: &str = "Sorry, something went wrong!";

/// Anything that can turn a prompt into reply text.
#[async_trait]
pub trait ResponseSource: Send + Sync {
    async fn fetch_response(&self, prompt: &str) -> String;
}

#[derive(Clone)]
pub struct ResponseClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl ResponseClient {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn request_reply(&self, prompt: &str) -> Result<String, reqwest::Error> {
        let url = generate_content_url(&self.base_url, &self.model);
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "Sending prompt");

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<GenerateContentResponse>().await?;
        Ok(body
            .reply_text()
            .map(str::to_owned)
            .unwrap_or_else(|| NO_RESPONSE_REPLY.to_string()))
    }
}

#[async_trait]
impl ResponseSource for ResponseClient {
    async fn fetch_response(&self, prompt: &str) -> String {
        match self.request_reply(prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                // reqwest errors carry the request URL, which includes the key
                warn!(error = %err.without_url(), "Error fetching response");
                FAILURE_REPLY.to_string()
            }
        }
    }
}
