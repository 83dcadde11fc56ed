//! HTTP client for an OpenAI-compatible chat-completions endpoint

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

use super::types::*;
use crate::config::Config;
use crate::error::{Error, Result};

const SYSTEM_PROMPT: &str =
    "You are a chess coach. Answer only with a single JSON object in the requested shape.";

/// Anything that can turn a prompt into a JSON answer
pub trait AiBackend {
    fn complete(&self, prompt: String) -> impl Future<Output = Result<String>> + Send;
}

pub struct AiClient {
    client: Client,
    api_key: String,
    url: String,
    model: String,
}

impl AiClient {
    pub fn new(api_key: String, url: String, model: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            url,
            model,
        })
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        match &config.ai_api_key {
            Some(key) => Self::new(
                key.clone(),
                config.ai_api_url.clone(),
                config.ai_model.clone(),
                config.ai_timeout,
            )
            .map(Some),
            None => Ok(None),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }
}

impl AiBackend for AiClient {
    async fn complete(&self, prompt: String) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            response_format: ResponseFormat::json_object(),
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&self.url)
            .headers(self.headers())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Ai(format!(
                "API error: {} - {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body: ChatResponse = response.json().await?;
        body.content()
            .map(str::to_string)
            .ok_or_else(|| Error::Ai("response had no message content".to_string()))
    }
}

/// The JSON object inside a reply, ignoring markdown fences or chatter
pub fn extract_json(reply: &str) -> &str {
    match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => reply.trim(),
    }
}
